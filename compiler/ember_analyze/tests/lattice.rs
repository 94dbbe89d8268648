//! Properties of the `VarState` merge.

use ember_analyze::VarState;
use proptest::prelude::*;

fn state() -> impl Strategy<Value = VarState> {
    prop_oneof![
        Just(VarState::Unset),
        Just(VarState::Undefined),
        Just(VarState::Valid),
        Just(VarState::Unknown),
    ]
}

proptest! {
    #[test]
    fn unset_or_undefined_on_the_left_wins(a in state(), b in state()) {
        if a.is_unset() {
            prop_assert_eq!(a.merge(b), a);
        }
    }

    #[test]
    fn unknown_is_identity(a in state()) {
        prop_assert_eq!(VarState::Unknown.merge(a), a);
        prop_assert_eq!(a.merge(VarState::Unknown), a);
    }

    #[test]
    fn merge_is_associative(a in state(), b in state(), c in state()) {
        prop_assert_eq!(a.merge(b).merge(c), a.merge(b.merge(c)));
    }

    #[test]
    fn merge_is_idempotent(a in state()) {
        prop_assert_eq!(a.merge(a), a);
    }

    #[test]
    fn result_is_one_of_the_operands(a in state(), b in state()) {
        let merged = a.merge(b);
        prop_assert!(merged == a || merged == b);
    }
}

#[test]
fn merge_is_not_commutative() {
    assert_eq!(VarState::Unset.merge(VarState::Undefined), VarState::Unset);
    assert_eq!(VarState::Undefined.merge(VarState::Unset), VarState::Undefined);
}
