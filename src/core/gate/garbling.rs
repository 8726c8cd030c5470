use digest::Digest;

use super::GateType;
use crate::core::{
    delta::Delta,
    label::{GarbledWire, LABEL_LEN, Label},
};

/// Row key: `H(row || left[..15] || right[..15])`, truncated to a label.
fn row_hash<H: Digest + Default>(row: usize, left: &Label, right: Option<&Label>) -> Label {
    let mut hasher = H::default()
        .chain_update([row as u8])
        .chain_update(left.key_bytes());
    if let Some(right) = right {
        hasher = hasher.chain_update(right.key_bytes());
    }
    let result = hasher.finalize();

    let mut bytes = [0u8; LABEL_LEN];
    let copy_len = result.len().min(LABEL_LEN);
    bytes[..copy_len].copy_from_slice(&result[..copy_len]);
    Label(bytes)
}

/// Fresh label pair for a wire that is neither XOR-derived nor a circuit output.
pub(crate) fn random_wire(rng: &mut impl rand::Rng, delta: &Delta) -> GarbledWire {
    let label0 = Label::random_keyed(rng);
    GarbledWire::new(label0, label0 ^ delta)
}

/// Build the point-and-permute table of one gate. `inputs` holds the label
/// pairs of the gates it reads from; returns `None` when their count does
/// not match the gate arity.
pub(crate) fn garble<H: Digest + Default>(
    gate_type: GateType,
    inputs: &[&GarbledWire],
    out: &GarbledWire,
) -> Option<Vec<Label>> {
    let f = gate_type.f();

    match (gate_type, inputs) {
        (GateType::Input, []) | (GateType::Xor, [_, _]) => Some(Vec::new()),
        (GateType::Const(value), []) => Some(vec![out.select(value)]),
        (GateType::Not | GateType::Copy | GateType::Output, [a]) => {
            let mask = a.label0.permute_bit();
            let mut table = vec![Label::ZERO; 2];
            for x in [false, true] {
                let loc = (x ^ mask) as usize;
                table[loc] = row_hash::<H>(loc, &a.select(x), None) ^ &out.select(f(x, false));
            }
            Some(table)
        }
        (GateType::And | GateType::Or, [a, b]) => {
            let mask_a = a.label0.permute_bit();
            let mask_b = b.label0.permute_bit();
            let mut table = vec![Label::ZERO; 4];
            for x in [false, true] {
                for y in [false, true] {
                    let loc = 2 * (x ^ mask_a) as usize + (y ^ mask_b) as usize;
                    table[loc] = row_hash::<H>(loc, &a.select(x), Some(&b.select(y)))
                        ^ &out.select(f(x, y));
                }
            }
            Some(table)
        }
        _ => None,
    }
}

/// Recover the output label of one gate from its table and the active input
/// labels. Returns `None` if the table or input count is inconsistent with
/// the gate type.
pub(crate) fn degarble<H: Digest + Default>(
    gate_type: GateType,
    table: &[Label],
    inputs: &[Label],
) -> Option<Label> {
    if table.len() != gate_type.table_rows() {
        return None;
    }

    match (gate_type, inputs) {
        (GateType::Xor, [a, b]) => Some(a ^ b),
        (GateType::Const(_), []) => table.first().copied(),
        (GateType::Not | GateType::Copy | GateType::Output, [a]) => {
            let loc = a.permute_bit() as usize;
            Some(row_hash::<H>(loc, a, None) ^ &table[loc])
        }
        (GateType::And | GateType::Or, [a, b]) => {
            let loc = 2 * a.permute_bit() as usize + b.permute_bit() as usize;
            Some(row_hash::<H>(loc, a, Some(b)) ^ &table[loc])
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    const TEST_CASES: [(bool, bool); 4] =
        [(false, false), (false, true), (true, false), (true, true)];

    fn trng() -> StdRng {
        StdRng::from_seed([0u8; 32])
    }

    fn garble_consistency(gt: GateType) {
        let mut rng = trng();
        let delta = Delta::generate(&mut rng);
        let a = random_wire(&mut rng, &delta);
        let b = random_wire(&mut rng, &delta);
        let c = random_wire(&mut rng, &delta);

        let table = garble::<blake3::Hasher>(gt, &[&a, &b], &c).unwrap();
        assert_eq!(table.len(), 4);

        for (a_vl, b_vl) in TEST_CASES {
            let evaluated =
                degarble::<blake3::Hasher>(gt, &table, &[a.select(a_vl), b.select(b_vl)]).unwrap();
            assert_eq!(
                evaluated,
                c.select((gt.f())(a_vl, b_vl)),
                "{gt:?} failed on ({a_vl}, {b_vl})"
            );
        }
    }

    fn unary_consistency(gt: GateType) {
        let mut rng = trng();
        let delta = Delta::generate(&mut rng);
        let a = random_wire(&mut rng, &delta);
        let c = random_wire(&mut rng, &delta);

        let table = garble::<blake3::Hasher>(gt, &[&a], &c).unwrap();
        assert_eq!(table.len(), 2);

        for a_vl in [false, true] {
            let evaluated = degarble::<blake3::Hasher>(gt, &table, &[a.select(a_vl)]).unwrap();
            assert_eq!(evaluated, c.select((gt.f())(a_vl, false)), "{gt:?} on {a_vl}");
        }
    }

    macro_rules! garble_consistency_tests {
        ($($check:ident($gate_type:expr) => $test_name:ident),*) => {
            $(
                #[test]
                fn $test_name() {
                    $check($gate_type);
                }
            )*
        };
    }

    garble_consistency_tests!(
        garble_consistency(GateType::And) => garble_consistency_and,
        garble_consistency(GateType::Or) => garble_consistency_or,
        unary_consistency(GateType::Not) => garble_consistency_not,
        unary_consistency(GateType::Copy) => garble_consistency_copy,
        unary_consistency(GateType::Output) => garble_consistency_output
    );

    #[test]
    fn test_xor_is_free() {
        let mut rng = trng();
        let delta = Delta::generate(&mut rng);
        let a = random_wire(&mut rng, &delta);
        let b = random_wire(&mut rng, &delta);
        let c = GarbledWire::new(a.label0 ^ &b.label0, a.label0 ^ &b.label1);

        let table = garble::<blake3::Hasher>(GateType::Xor, &[&a, &b], &c).unwrap();
        assert!(table.is_empty());

        for (a_vl, b_vl) in TEST_CASES {
            let evaluated = degarble::<blake3::Hasher>(
                GateType::Xor,
                &table,
                &[a.select(a_vl), b.select(b_vl)],
            )
            .unwrap();
            assert_eq!(evaluated, c.select(a_vl ^ b_vl));
        }
    }

    #[test]
    fn test_const_row_is_plain_label() {
        let mut rng = trng();
        let delta = Delta::generate(&mut rng);
        let c = random_wire(&mut rng, &delta);

        let table = garble::<blake3::Hasher>(GateType::Const(true), &[], &c).unwrap();
        assert_eq!(table, vec![c.label1]);
        assert_eq!(
            degarble::<blake3::Hasher>(GateType::Const(true), &table, &[]),
            Some(c.label1)
        );
    }

    #[test]
    fn test_arity_mismatch_rejected() {
        let mut rng = trng();
        let delta = Delta::generate(&mut rng);
        let a = random_wire(&mut rng, &delta);
        assert!(garble::<blake3::Hasher>(GateType::And, &[&a], &a).is_none());
        assert!(degarble::<blake3::Hasher>(GateType::And, &[Label::ZERO; 2], &[a.label0]).is_none());
    }

    #[test]
    fn test_different_hash_functions() {
        use sha2::Sha256;

        let mut rng = trng();
        let delta = Delta::generate(&mut rng);
        let a = random_wire(&mut rng, &delta);
        let b = random_wire(&mut rng, &delta);
        let c = random_wire(&mut rng, &delta);

        let t_blake3 = garble::<blake3::Hasher>(GateType::And, &[&a, &b], &c).unwrap();
        let t_sha256 = garble::<Sha256>(GateType::And, &[&a, &b], &c).unwrap();

        assert_ne!(t_blake3, t_sha256);
    }
}
