use num_bigint::{BigInt, BigUint};
use rstest::rstest;
use textbook_rsa::rsa::{block_size_for, gcd, BlockCodec};
use textbook_rsa::{decrypt, encrypt, generate, generate_key, KeyGenConfig, KeyMaterial, RsaError, RsaKey};

fn textbook() -> KeyMaterial {
    KeyMaterial::from_primes(BigUint::from(61u8), BigUint::from(53u8), BigUint::from(17u8)).unwrap()
}

#[test]
fn textbook_single_byte() {
    let public: RsaKey = "17 3233".parse().unwrap();
    let private: RsaKey = "2753 3233".parse().unwrap();

    let ciphertext = encrypt(&[65], &public).unwrap();
    let first: BigUint = ciphertext.split_whitespace().next().unwrap().parse().unwrap();
    assert_eq!(first, BigUint::from(2790u16));

    assert_eq!(decrypt(&ciphertext, &private).unwrap(), vec![65]);
}

#[test]
fn textbook_key_material_matches_override() {
    let key = textbook();
    assert_eq!(key.public_key(), "17 3233".parse::<RsaKey>().unwrap());
    assert_eq!(key.private_key(), "2753 3233".parse::<RsaKey>().unwrap());
}

#[test]
fn empty_payload_is_marker_only() {
    let key = textbook();
    let ciphertext = encrypt(&[], &key.public_key()).unwrap();
    assert_eq!(ciphertext, "0");
    assert!(decrypt(&ciphertext, &key.private_key()).unwrap().is_empty());
}

#[test]
fn malformed_stream_yields_no_output() {
    let key = textbook();
    let result = decrypt("2790 0 x1", &key.private_key());
    assert!(matches!(
        result,
        Err(RsaError::MalformedCiphertext { position: 2, .. })
    ));
}

#[test]
fn generated_keys_satisfy_invariants() {
    for _ in 0..3 {
        let key = generate_key(80).unwrap();
        let phi = key.totient();
        let e = BigInt::from(key.e().clone());
        assert_eq!(gcd(&e, &BigInt::from(phi.clone())), BigInt::from(1u8));
        assert_eq!((key.e() * key.d()) % &phi, BigUint::from(1u8));
    }
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
#[case(15)]
#[case(16)]
#[case(17)]
#[case(1000)]
fn generated_key_roundtrip(#[case] len: usize) {
    let key = generate(&KeyGenConfig::default().with_bit_length(128)).unwrap();
    assert!(block_size_for(key.n()) >= 1);
    let message: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();

    let ciphertext = encrypt(&message, &key.public_key()).unwrap();
    assert_eq!(decrypt(&ciphertext, &key.private_key()).unwrap(), message);
}

#[test]
fn codec_boundaries_for_generated_modulus() {
    let key = generate_key(128).unwrap();
    let codec = BlockCodec::for_modulus(key.n()).unwrap();
    let bs = codec.block_size();

    for len in [0, 1, bs, bs + 1, 2 * bs] {
        let message = vec![0xa5u8; len];
        let blocks = codec.encode(&message);
        assert!(blocks.iter().all(|block| block < key.n()));
        assert_eq!(codec.decode(&blocks).unwrap(), message);

        let ciphertext = encrypt(&message, &key.public_key()).unwrap();
        assert_eq!(decrypt(&ciphertext, &key.private_key()).unwrap(), message);
    }
}

#[test]
fn key_reuse_across_calls() {
    let key = textbook();
    let first = encrypt(b"first", &key.public_key()).unwrap();
    let second = encrypt(b"second message", &key.public_key()).unwrap();

    assert_eq!(decrypt(&second, &key.private_key()).unwrap(), b"second message");
    assert_eq!(decrypt(&first, &key.private_key()).unwrap(), b"first");
    // textbook RSA is deterministic
    assert_eq!(encrypt(b"first", &key.public_key()).unwrap(), first);
}
