pub mod alignment;
pub mod alignment_algorithm;
pub mod alignment_matrix;
pub mod alignment_result;
pub mod batch;
pub mod comparator;
pub mod config;
pub mod error;
pub mod gap_penalty;
pub mod hirschberg;
mod io;
pub mod needleman_wunsch;
pub mod optimization;
pub mod score;
pub mod scoring;
pub mod segment;

#[cfg(test)]
mod test_util;
#[cfg(test)]
mod tests;
