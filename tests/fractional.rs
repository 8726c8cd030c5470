use std::path::PathBuf;

use fuzzy_detect::{scheme::TranscriptError, *};
use rand::{SeedableRng, rngs::StdRng};
use test_log::test;

fn trng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn detection_rate(
    scheme: &FractionalScheme,
    gamma: usize,
    threshold: i64,
    trials: usize,
    seed: u64,
) -> usize {
    let mut rng = trng(seed);
    let (sk, pk) = scheme.keygen(gamma, &mut rng).unwrap();
    let dsk = scheme.extract(threshold, &sk).unwrap();

    (0..trials)
        .filter(|_| {
            let transcript = scheme.flag(&pk, &mut rng).unwrap();
            scheme.test(&transcript, &dsk).unwrap()
        })
        .count()
}

#[test]
fn test_half_threshold_detects_half() {
    let scheme = FractionalScheme::<P256>::default();
    let hits = detection_rate(&scheme, 8, 128, 100, 0);
    // expected 50
    assert!((25..=75).contains(&hits), "hits = {hits}");
}

#[test]
fn test_quarter_threshold_detects_quarter() {
    let scheme = FractionalScheme::<P256>::default();
    let hits = detection_rate(&scheme, 8, 64, 120, 1);
    // expected 30
    assert!((10..=55).contains(&hits), "hits = {hits}");
}

#[test]
fn test_zero_threshold_never_detects() {
    let scheme = FractionalScheme::<P256>::default();
    assert_eq!(detection_rate(&scheme, 8, 0, 20, 2), 0);
}

#[test]
fn test_retest_is_deterministic() {
    let scheme = FractionalScheme::<P256>::default();
    let mut rng = trng(3);
    let (sk, pk) = scheme.keygen(8, &mut rng).unwrap();
    let dsk = scheme.extract(100, &sk).unwrap();

    for _ in 0..10 {
        let transcript = scheme.flag(&pk, &mut rng).unwrap();
        let first = scheme.test(&transcript, &dsk).unwrap();
        for _ in 0..3 {
            assert_eq!(scheme.test(&transcript, &dsk).unwrap(), first);
        }
    }
}

#[test]
fn test_wide_gamma() {
    let scheme = FractionalScheme::<P256>::default();
    let mut rng = trng(4);
    let (sk, pk) = scheme.keygen(24, &mut rng).unwrap();
    assert_eq!(pk.len(), 48);

    let always = scheme.extract((1 << 24) - 1, &sk).unwrap();
    let never = scheme.extract(0, &sk).unwrap();

    for _ in 0..3 {
        let transcript = scheme.flag(&pk, &mut rng).unwrap();
        // misses only when the low 24 bits of the sender value are all zero
        assert!(scheme.test(&transcript, &always).unwrap());
        assert!(!scheme.test(&transcript, &never).unwrap());
    }

    assert!(matches!(
        scheme.extract(1 << 24, &sk),
        Err(Error::InvalidSelector { .. })
    ));
}

#[test]
fn test_wide_gamma_half_threshold() {
    let scheme = FractionalScheme::<P256>::default();
    let hits = detection_rate(&scheme, 24, 1 << 23, 200, 10);
    // expected 100
    assert!((70..=130).contains(&hits), "hits = {hits}");
}

#[test]
fn test_wide_gamma_three_quarter_threshold() {
    let scheme = FractionalScheme::<P256>::default();
    let hits = detection_rate(&scheme, 24, 3 << 22, 200, 11);
    // expected 150
    assert!((120..=180).contains(&hits), "hits = {hits}");
}

#[test]
fn test_threshold_wider_than_gamma_rejected() {
    let scheme = FractionalScheme::<P256>::default();
    let mut rng = trng(12);
    let (sk, pk) = scheme.keygen(8, &mut rng).unwrap();
    let dsk = scheme.extract(200, &sk).unwrap();
    let forged = SecKey::new(dsk.keys().to_vec(), SecKey::FULL_KEY);

    let transcript = scheme.flag(&pk, &mut rng).unwrap();
    assert!(scheme.test(&transcript, &dsk).is_ok());
    assert!(matches!(
        scheme.test(&transcript, &forged),
        Err(Error::InvalidSelector { bound: 256, .. })
    ));
}

#[test]
fn test_extract_bounds() {
    let scheme = FractionalScheme::<P256>::default();
    let mut rng = trng(5);
    let (sk, _) = scheme.keygen(8, &mut rng).unwrap();

    assert!(scheme.extract(0, &sk).is_ok());
    assert!(scheme.extract(255, &sk).is_ok());
    assert!(matches!(
        scheme.extract(-1, &sk),
        Err(Error::InvalidSelector { .. })
    ));
    assert!(matches!(
        scheme.extract(256, &sk),
        Err(Error::InvalidSelector { .. })
    ));
}

#[test]
fn test_unrelated_key_is_not_an_error() {
    let scheme = FractionalScheme::<P256>::default();
    let mut rng = trng(6);
    let (_, pk) = scheme.keygen(8, &mut rng).unwrap();
    let (other, _) = scheme.keygen(8, &mut rng).unwrap();
    let dsk = scheme.extract(200, &other).unwrap();

    let transcript = scheme.flag(&pk, &mut rng).unwrap();
    assert!(scheme.test(&transcript, &dsk).is_ok());
}

#[test]
fn test_malformed_transcripts_rejected() {
    let scheme = FractionalScheme::<P256>::default();
    let mut rng = trng(7);
    let (sk, pk) = scheme.keygen(8, &mut rng).unwrap();
    let dsk = scheme.extract(10, &sk).unwrap();
    let transcript = scheme.flag(&pk, &mut rng).unwrap();

    assert!(matches!(
        scheme.test(&transcript[..transcript.len() - 1], &dsk),
        Err(Error::Transcript(TranscriptError::Length { .. }))
    ));

    let mut long = transcript.clone();
    long.push(0);
    assert!(matches!(
        scheme.test(&long, &dsk),
        Err(Error::Transcript(TranscriptError::Length { .. }))
    ));

    let mut signed = transcript.clone();
    signed[0] = 1;
    assert!(matches!(
        scheme.test(&signed, &dsk),
        Err(Error::Transcript(TranscriptError::SignByte { offset: 0, value: 1 }))
    ));
}

#[test]
fn test_unsupported_gamma() {
    let scheme = FractionalScheme::<P256>::default();
    let mut rng = trng(8);
    assert!(matches!(
        scheme.keygen(12, &mut rng),
        Err(Error::UnsupportedGamma(12))
    ));
}

#[test]
fn test_circuit_loaded_from_file() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("circuits/cmp_48_8.circ");
    let table = CircuitTable::new().with(8, CircuitSource::Path(path));
    let scheme = FractionalScheme::new(P256::new(), table);

    let hits = detection_rate(&scheme, 8, 255, 10, 9);
    assert!(hits >= 9, "hits = {hits}");
}
