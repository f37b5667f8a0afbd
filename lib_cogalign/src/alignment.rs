use std::{fmt::Display, sync::Arc};

use itertools::Itertools;

use crate::{
    error::{Error, Result},
    io::display_width,
    segment::{FeatureModel, Segment},
};

/// A rectangular table of segments, one row per aligned sequence.
///
/// Gaps are stored as gap segments, so every row has the same number of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment<T> {
    model: Arc<FeatureModel>,
    rows: Vec<Vec<Segment<T>>>,
}

impl<T: Clone> Alignment<T> {
    /// Creates an alignment from its rows, which must all have the same length.
    pub fn from_rows(model: Arc<FeatureModel>, rows: Vec<Vec<Segment<T>>>) -> Result<Self> {
        if let Some(first) = rows.first() {
            let expected = first.len();
            for (row, segments) in rows.iter().enumerate() {
                if segments.len() != expected {
                    return Err(Error::UnequalRowLengths {
                        row,
                        expected,
                        actual: segments.len(),
                    });
                }
                for segment in segments {
                    model.check_segment(segment)?;
                }
            }
        }

        Ok(Self { model, rows })
    }

    /// Creates a pairwise alignment from its columns in left-to-right order.
    pub fn from_pairs(
        model: Arc<FeatureModel>,
        pairs: impl IntoIterator<Item = (Segment<T>, Segment<T>)>,
    ) -> Self {
        let (top, bottom): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        Self {
            model,
            rows: vec![top, bottom],
        }
    }

    /// Returns a copy of this alignment with one more column at the end.
    pub fn extended(&self, column: Vec<Segment<T>>) -> Result<Self> {
        if column.len() != self.rows.len() {
            return Err(Error::WrongSequenceCount {
                expected: self.rows.len(),
                actual: column.len(),
            });
        }

        let mut result = self.clone();
        for (row, segment) in result.rows.iter_mut().zip(column) {
            self.model.check_segment(&segment)?;
            row.push(segment);
        }
        Ok(result)
    }

    /// Swaps the order of the rows.
    pub fn transposed(&self) -> Self {
        Self {
            model: self.model.clone(),
            rows: self.rows.iter().rev().cloned().collect(),
        }
    }

    /// The columns of `self` followed by the columns of `other`.
    pub fn concatenated(&self, other: &Self) -> Result<Self> {
        if self.rows.len() != other.rows.len() {
            return Err(Error::WrongSequenceCount {
                expected: self.rows.len(),
                actual: other.rows.len(),
            });
        }

        Ok(Self {
            model: self.model.clone(),
            rows: self
                .rows
                .iter()
                .zip(&other.rows)
                .map(|(first, second)| first.iter().chain(second).cloned().collect())
                .collect(),
        })
    }
}

impl<T> Alignment<T> {
    pub fn model(&self) -> &Arc<FeatureModel> {
        &self.model
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&Segment<T>> {
        self.rows.get(row).and_then(|row| row.get(column))
    }

    pub fn row(&self, row: usize) -> &[Segment<T>] {
        &self.rows[row]
    }

    pub fn column(&self, column: usize) -> impl Iterator<Item = &Segment<T>> {
        self.rows.iter().map(move |row| &row[column])
    }

    pub fn iter_columns(&self) -> impl Iterator<Item = Vec<&Segment<T>>> {
        (0..self.columns()).map(|column| self.column(column).collect())
    }

    /// The segments of a pairwise alignment column by column.
    ///
    /// **Panics** if the alignment does not have exactly two rows.
    pub fn iter_pairs(&self) -> impl Iterator<Item = (&Segment<T>, &Segment<T>)> {
        assert_eq!(self.rows.len(), 2, "not a pairwise alignment");
        self.rows[0].iter().zip(&self.rows[1])
    }

    pub fn gap_count(&self) -> usize {
        self.rows.iter().flatten().filter(|segment| segment.is_gap()).count()
    }

    pub fn is_gap_free(&self) -> bool {
        self.gap_count() == 0
    }

    /// The symbols of one row, without padding.
    pub fn row_symbols(&self, row: usize) -> Vec<&str> {
        self.rows[row].iter().map(Segment::symbol).collect()
    }

    /// Renders the alignment with one line per row.
    ///
    /// Symbols are separated by a single space and padded to the widest symbol of their column.
    /// Combining marks do not count towards the width.
    pub fn render(&self) -> String {
        let widths: Vec<_> = (0..self.columns())
            .map(|column| {
                self.column(column)
                    .map(|segment| display_width(segment.symbol()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&widths)
                    .map(|(segment, width)| {
                        let padding = width - display_width(segment.symbol());
                        format!("{}{}", segment.symbol(), " ".repeat(padding))
                    })
                    .join(" ")
                    .trim_end()
                    .to_string()
            })
            .join("\n")
    }
}

impl<T> Display for Alignment<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::Alignment;
    use crate::{error::Error, segment::Segment, test_util::letter_factory};

    fn pairwise(top: &str, bottom: &str) -> Alignment<i64> {
        let factory = letter_factory();
        Alignment::from_pairs(
            factory.model().clone(),
            top.chars().zip(bottom.chars()).map(|(top, bottom)| {
                (
                    factory.segment(&top.to_string()).unwrap(),
                    factory.segment(&bottom.to_string()).unwrap(),
                )
            }),
        )
    }

    #[test]
    fn accessors() {
        let alignment = pairwise("#_aba", "#baba");
        assert_eq!(alignment.rows(), 2);
        assert_eq!(alignment.columns(), 5);
        assert_eq!(alignment.get(0, 1).unwrap().symbol(), "_");
        assert_eq!(alignment.get(2, 0), None);
        assert_eq!(alignment.row_symbols(1), vec!["#", "b", "a", "b", "a"]);
        assert_eq!(
            alignment
                .column(2)
                .map(Segment::symbol)
                .collect::<Vec<_>>(),
            vec!["a", "a"]
        );
        assert_eq!(alignment.iter_columns().count(), 5);
        assert_eq!(alignment.gap_count(), 1);
        assert!(!alignment.is_gap_free());
        assert!(pairwise("#ab", "#ba").is_gap_free());
    }

    #[test]
    fn render_pads_columns() {
        let factory = letter_factory();
        let alignment = pairwise("#_aba", "#baba");
        assert_eq!(alignment.render(), "# _ a b a\n# b a b a");
        assert_eq!(alignment.to_string(), alignment.render());

        let accented = factory.segment("a").unwrap().relabeled("a\u{0301}");
        let long = factory.segment("b").unwrap().relabeled("bb");
        let alignment = Alignment::from_rows(
            factory.model().clone(),
            vec![
                vec![accented, factory.gap().clone()],
                vec![long, factory.segment("c").unwrap()],
            ],
        )
        .unwrap();
        assert_eq!(alignment.render(), "a\u{0301}  _\nbb c");
    }

    #[test]
    fn copy_construction() {
        let factory = letter_factory();
        let alignment = pairwise("#a", "#b");
        let extended = alignment
            .extended(vec![factory.gap().clone(), factory.segment("c").unwrap()])
            .unwrap();
        assert_eq!(alignment.columns(), 2);
        assert_eq!(extended.columns(), 3);
        assert_eq!(extended.render(), "# a _\n# b c");
        assert!(matches!(
            alignment.extended(vec![factory.gap().clone()]),
            Err(Error::WrongSequenceCount {
                expected: 2,
                actual: 1
            })
        ));

        let concatenated = alignment.concatenated(&pairwise("c", "_")).unwrap();
        assert_eq!(concatenated.render(), "# a c\n# b _");
        assert_eq!(concatenated.transposed().render(), "# b _\n# a c");
    }

    #[test]
    fn unequal_rows_are_rejected() {
        let factory = letter_factory();
        let result = Alignment::from_rows(
            factory.model().clone(),
            vec![
                vec![factory.boundary().clone()],
                vec![factory.boundary().clone(), factory.gap().clone()],
            ],
        );
        assert!(matches!(
            result,
            Err(Error::UnequalRowLengths {
                row: 1,
                expected: 1,
                actual: 2
            })
        ));
    }
}
