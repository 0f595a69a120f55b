//! Helpers for the contract crates' unit tests: mock entrypoints for
//! collaborator contracts and an in-memory allowance tree builder. Native
//! targets only; the production tree builder lives off-chain.

use concordium_std::test_infrastructure::MockFn;
use concordium_std::*;

use super::{
    allowance_leaf, branch_node, AllowanceProof, AssetAmount, ProofStep, SiblingSide,
};

/// Mock entrypoint that checks the parameter parses as `D` and returns
/// `return_value`.
pub fn parse_and_ok_mock<D: Deserial, S>(
    return_value: impl Clone + Serial + 'static,
) -> MockFn<S> {
    MockFn::new(move |parameter, _amount, _balance, _state| {
        D::deserial(&mut Cursor::new(parameter)).map_err(|_| CallContractError::Trap)?;
        Ok((false, Some(return_value.clone())))
    })
}

/// Mock entrypoint that parses the parameter as `D`, fails the invocation
/// unless `check` accepts it, and returns `return_value` otherwise.
pub fn parse_and_check_mock<D: Deserial, S>(
    check: impl Fn(&D) -> bool + 'static,
    return_value: impl Clone + Serial + 'static,
) -> MockFn<S> {
    MockFn::new(move |parameter, _, _, _state| {
        let value =
            D::deserial(&mut Cursor::new(parameter)).map_err(|_| CallContractError::Trap)?;
        if !check(&value) {
            return Err(CallContractError::Trap);
        };
        Ok((false, Some(return_value.clone())))
    })
}

/// Build the committed tree over an allowance table and a proof per entry,
/// in entry order. An odd node at the end of a level is promoted unchanged.
pub fn build_allowance_tree(
    entries: &[(AccountAddress, AssetAmount)],
) -> ([u8; 32], Vec<AllowanceProof>) {
    assert!(!entries.is_empty(), "allowance table must not be empty");

    let mut level: Vec<[u8; 32]> = entries
        .iter()
        .map(|(account, limit)| allowance_leaf(account, *limit))
        .collect();
    let mut proofs = vec![AllowanceProof { steps: Vec::new() }; entries.len()];
    let mut positions: Vec<usize> = (0..entries.len()).collect();

    while level.len() > 1 {
        for (i, position) in positions.iter_mut().enumerate() {
            let sibling = *position ^ 1;
            if sibling < level.len() {
                let side = if sibling < *position {
                    SiblingSide::Left
                } else {
                    SiblingSide::Right
                };
                proofs[i].steps.push(ProofStep {
                    side,
                    digest: level[sibling],
                });
            }
            *position /= 2;
        }

        level = level
            .chunks(2)
            .map(|pair| {
                if pair.len() == 2 {
                    branch_node(&pair[0], &pair[1])
                } else {
                    pair[0]
                }
            })
            .collect();
    }

    (level[0], proofs)
}
