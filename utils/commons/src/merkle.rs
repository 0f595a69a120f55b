//! Inclusion proofs for the committed allowance table.
//!
//! The table of `(account, limit)` pairs lives off-chain; only its keccak-256
//! Merkle root is committed on-chain. A leaf is
//! `keccak(0x00 || account || limit as u64 LE)`, an interior node is
//! `keccak(0x01 || left || right)`. The prefixes keep the leaf and node
//! domains apart.

use super::*;
use sha3::{Digest, Keccak256};

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

/// Position of a sibling digest relative to the running digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SchemaType)]
pub enum SiblingSide {
    Left,
    Right,
}

/// One step of an inclusion proof: a sibling digest and the side it sits on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SchemaType)]
pub struct ProofStep {
    pub side: SiblingSide,
    pub digest: [u8; 32],
}

/// Ordered inclusion proof for a single allowance leaf, leaf level first.
/// Produced off-chain from a snapshot of the allowance table; never stored
/// on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SchemaType)]
pub struct AllowanceProof {
    pub steps: Vec<ProofStep>,
}

/// Digest committing a single allowance: the account that may spend and the
/// maximum cumulative amount it may spend.
pub fn allowance_leaf(account: &AccountAddress, limit: AssetAmount) -> [u8; 32] {
    let mut hasher = Keccak256::default();
    hasher.update([LEAF_PREFIX]);
    hasher.update(account.0);
    hasher.update(limit.to_le_bytes());
    hasher.finalize().into()
}

/// Digest of an interior node over its two children.
pub fn branch_node(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Keccak256::default();
    hasher.update([NODE_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Decide whether `(account, limit)` was committed under `root`.
///
/// Deterministic and free of side effects. A forged limit, a leaf bound to
/// a different account, or a witness with a wrong digest, side, order or
/// length all fail.
pub fn verify_allowance(
    root: &AllowanceRoot,
    account: &AccountAddress,
    limit: AssetAmount,
    proof: &AllowanceProof,
) -> bool {
    let mut digest = allowance_leaf(account, limit);
    for step in proof.steps.iter() {
        digest = match step.side {
            SiblingSide::Left => branch_node(&step.digest, &digest),
            SiblingSide::Right => branch_node(&digest, &step.digest),
        };
    }
    digest == *root
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use crate::test::build_allowance_tree;

    const ALICE: AccountAddress = AccountAddress([1; 32]);
    const BOB: AccountAddress = AccountAddress([2; 32]);
    const CAROL: AccountAddress = AccountAddress([3; 32]);
    const DAVE: AccountAddress = AccountAddress([4; 32]);

    fn table() -> Vec<(AccountAddress, AssetAmount)> {
        vec![(ALICE, 100), (BOB, 50), (CAROL, 200)]
    }

    #[concordium_test]
    fn test_every_member_verifies() {
        let entries = table();
        let (root, proofs) = build_allowance_tree(&entries);

        for (i, (account, limit)) in entries.iter().enumerate() {
            claim!(
                verify_allowance(&root, account, *limit, &proofs[i]),
                "member {} must verify under the committed root",
                i
            );
        }
    }

    #[concordium_test]
    fn test_single_leaf_table() {
        let (root, proofs) = build_allowance_tree(&[(ALICE, 7)]);

        claim_eq!(proofs[0].steps.len(), 0);
        claim!(verify_allowance(&root, &ALICE, 7, &proofs[0]));
        claim!(!verify_allowance(&root, &ALICE, 8, &proofs[0]));
    }

    #[concordium_test]
    fn test_even_member_count() {
        let entries = vec![(ALICE, 100), (BOB, 50), (CAROL, 200), (DAVE, 1)];
        let (root, proofs) = build_allowance_tree(&entries);

        for (i, (account, limit)) in entries.iter().enumerate() {
            claim!(verify_allowance(&root, account, *limit, &proofs[i]));
        }
    }

    #[concordium_test]
    fn test_forged_limit_fails() {
        let (root, proofs) = build_allowance_tree(&table());

        claim!(!verify_allowance(&root, &ALICE, 101, &proofs[0]));
        claim!(!verify_allowance(&root, &ALICE, 0, &proofs[0]));
        // A limit committed for another account must not transfer over
        claim!(!verify_allowance(&root, &ALICE, 50, &proofs[0]));
    }

    #[concordium_test]
    fn test_wrong_account_fails() {
        let (root, proofs) = build_allowance_tree(&table());

        claim!(!verify_allowance(&root, &BOB, 100, &proofs[0]));
        claim!(!verify_allowance(&root, &AccountAddress([9; 32]), 100, &proofs[0]));
    }

    #[concordium_test]
    fn test_tampered_witness_fails() {
        let (root, proofs) = build_allowance_tree(&table());

        // Flip one bit of a sibling digest
        let mut flipped = proofs[0].clone();
        flipped.steps[0].digest[0] ^= 1;
        claim!(!verify_allowance(&root, &ALICE, 100, &flipped));

        // Flip a positional flag
        let mut mirrored = proofs[0].clone();
        mirrored.steps[0].side = match mirrored.steps[0].side {
            SiblingSide::Left => SiblingSide::Right,
            SiblingSide::Right => SiblingSide::Left,
        };
        claim!(!verify_allowance(&root, &ALICE, 100, &mirrored));

        // Truncate the path
        let mut truncated = proofs[0].clone();
        truncated.steps.pop();
        claim!(!verify_allowance(&root, &ALICE, 100, &truncated));

        // Reorder the path
        let mut reordered = proofs[0].clone();
        reordered.steps.reverse();
        claim!(!verify_allowance(&root, &ALICE, 100, &reordered));
    }

    #[concordium_test]
    fn test_proof_is_leaf_specific() {
        let entries = table();
        let (root, proofs) = build_allowance_tree(&entries);

        claim!(!verify_allowance(&root, &ALICE, 100, &proofs[1]));
        claim!(!verify_allowance(&root, &BOB, 50, &proofs[0]));
    }

    #[concordium_test]
    fn test_wrong_root_fails() {
        let (_, proofs) = build_allowance_tree(&table());
        let (other_root, _) = build_allowance_tree(&[(ALICE, 100), (BOB, 51), (CAROL, 200)]);

        claim!(!verify_allowance(&other_root, &ALICE, 100, &proofs[0]));
    }
}
