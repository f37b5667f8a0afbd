use std::collections::BTreeSet;

use crate::{
    alignment::Alignment,
    alignment_algorithm::AlignmentAlgorithm,
    alignment_matrix::{AlignmentWindow, BaseAlignmentType},
    comparator::MismatchComparator,
    gap_penalty::{ConstantGapPenalty, ConvexGapPenalty, GapPenalty, NullGapPenalty},
    needleman_wunsch::{self, NeedlemanWunschAlgorithm},
    optimization::Optimization,
    scoring::score_moves,
    segment::Sequence,
    test_util::{Xorshift, letter_factory, word},
};

fn all_paths(left_length: usize, right_length: usize) -> Vec<Vec<BaseAlignmentType>> {
    if left_length == 0 && right_length == 0 {
        return vec![Vec::new()];
    }

    let mut result = Vec::new();
    let mut extend = |left_length, right_length, alignment_type| {
        for mut path in all_paths(left_length, right_length) {
            path.push(alignment_type);
            result.push(path);
        }
    };
    if left_length > 0 && right_length > 0 {
        extend(
            left_length - 1,
            right_length - 1,
            BaseAlignmentType::Substitution,
        );
    }
    if left_length > 0 {
        extend(left_length - 1, right_length, BaseAlignmentType::Deletion);
    }
    if right_length > 0 {
        extend(left_length, right_length - 1, BaseAlignmentType::Insertion);
    }
    result
}

fn rows(alignment: &Alignment<i64>) -> (String, String) {
    (
        alignment.row_symbols(0).concat(),
        alignment.row_symbols(1).concat(),
    )
}

fn gap_penalty(index: usize) -> Box<dyn GapPenalty> {
    match index {
        0 => Box::new(NullGapPenalty),
        1 => Box::new(ConstantGapPenalty::new(1.5).unwrap()),
        2 => Box::new(ConvexGapPenalty::new(3.0, 1.0).unwrap()),
        _ => Box::new(ConvexGapPenalty::new(1.0, 2.0).unwrap()),
    }
}

#[test]
fn enumerates_exactly_the_optimal_alignments() {
    let factory = letter_factory();
    let mut random = Xorshift::new(2024);

    for round in 0..120 {
        let algorithm = NeedlemanWunschAlgorithm::new(
            Box::new(MismatchComparator::default()),
            gap_penalty(round % 4),
            Optimization::Min,
            factory.gap_sequence().clone(),
        )
        .with_max_alignments(usize::MAX);
        let left = word(&factory, &random.word(3, 3));
        let right = word(&factory, &random.word(3, 3));
        let problem = algorithm.problem(&left, &right).unwrap();
        let window = AlignmentWindow::new(0..left.len(), 0..right.len());

        let scored: Vec<_> = all_paths(left.len(), right.len())
            .into_iter()
            .map(|path| (score_moves(&problem, &path).unwrap(), path))
            .collect();
        let optimum = Optimization::Min
            .best(scored.iter().map(|(score, _)| *score))
            .unwrap();
        let expected: BTreeSet<_> = scored
            .iter()
            .filter(|(score, _)| *score == optimum)
            .map(|(_, path)| {
                rows(&Alignment::from_pairs(
                    left.model().clone(),
                    needleman_wunsch::columns(&problem, &window, path),
                ))
            })
            .collect();

        let result = algorithm.align_pair(&left, &right).unwrap();
        assert_eq!(result.score(), optimum, "{left} / {right}");
        let actual: BTreeSet<_> = result.alignments().iter().map(rows).collect();
        assert_eq!(actual.len(), result.alignments().len());
        assert_eq!(actual, expected, "{left} / {right}");
    }
}

#[test]
fn identity_and_symmetry() {
    let factory = letter_factory();
    let mut random = Xorshift::new(5);
    let algorithm = NeedlemanWunschAlgorithm::new(
        Box::new(MismatchComparator::default()),
        Box::new(ConvexGapPenalty::new(2.0, 0.5).unwrap()),
        Optimization::Min,
        factory.gap_sequence().clone(),
    )
    .with_max_alignments(usize::MAX);

    for _ in 0..100 {
        let left: Sequence<i64> = word(&factory, &random.word(8, 4));
        let right = word(&factory, &random.word(8, 4));

        let identity = algorithm.align_pair(&left, &left).unwrap();
        assert_eq!(identity.score().as_f64(), 0.0);
        assert!(identity.alignments().iter().all(Alignment::is_gap_free));

        let forward = algorithm.align_pair(&left, &right).unwrap();
        let backward = algorithm.align_pair(&right, &left).unwrap();
        assert_eq!(forward.score(), backward.score(), "{left} / {right}");
        let transposed: BTreeSet<_> = backward
            .alignments()
            .iter()
            .map(|alignment| rows(&alignment.transposed()))
            .collect();
        let forward: BTreeSet<_> = forward.alignments().iter().map(rows).collect();
        assert_eq!(forward, transposed, "{left} / {right}");
    }
}
