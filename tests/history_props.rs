use proptest::prelude::*;
use retouch::editing::{EditHistory, EncodedImage};

#[derive(Debug, Clone)]
enum Op {
    Undo,
    Redo,
    Propose(u8),
    Accept,
    Reset(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Undo),
        3 => Just(Op::Redo),
        2 => any::<u8>().prop_map(Op::Propose),
        2 => Just(Op::Accept),
        1 => any::<u8>().prop_map(Op::Reset),
    ]
}

fn image(n: u8) -> EncodedImage {
    EncodedImage::new("p.png", n.to_string(), "image/png")
}

proptest! {
    #[test]
    fn cursor_stays_in_bounds(ops in prop::collection::vec(op(), 0..64)) {
        let mut history = EditHistory::new();
        history.reset(image(0));

        for op in ops {
            match op {
                Op::Undo => { let _ = history.undo(); }
                Op::Redo => { let _ = history.redo(); }
                Op::Propose(n) => history.propose(image(n)),
                Op::Accept => { let _ = history.accept_pending(); }
                Op::Reset(n) => history.reset(image(n)),
            }

            prop_assert!(!history.is_empty());
            prop_assert!(history.cursor() < history.len());
            prop_assert_eq!(history.can_undo(), history.cursor() != 0);
            prop_assert_eq!(history.can_redo(), history.cursor() != history.len() - 1);
        }
    }

    #[test]
    fn undo_redo_round_trip_is_identity(steps in 1usize..8, back in 0usize..8) {
        let mut history = EditHistory::new();
        history.reset(image(0));
        for n in 1..=steps {
            history.propose(image(n as u8));
            history.accept_pending().unwrap();
        }
        let before = history.displayed().cloned();

        let back = back.min(steps);
        for _ in 0..back {
            history.undo().unwrap();
        }
        for _ in 0..back {
            history.redo().unwrap();
        }

        prop_assert_eq!(history.displayed().cloned(), before);
        prop_assert_eq!(history.len(), steps + 1);
    }
}
