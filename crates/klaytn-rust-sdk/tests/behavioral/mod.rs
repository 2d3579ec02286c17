//! Behavioral tests for the SDK.
//!
//! These tests exercise keyrings through the public API only, the way a
//! wallet would use them.

mod multiple_keyring_tests {
    use klaytn_rust_sdk::account::AccountKey;
    use klaytn_rust_sdk::crypto::{parse_hash, PrivateKey};
    use klaytn_rust_sdk::keyring::{KeyRole, MultipleKeyring};
    use klaytn_rust_sdk::{AbstractKeyring, Address, ChainId, KlaytnError};

    const KEY_1: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";
    const KEY_2: &str = "0x2222222222222222222222222222222222222222222222222222222222222222";

    fn address() -> Address {
        Address::from_hex("0xabcabcabcabcabcabcabcabcabcabcabcabcabca").unwrap()
    }

    fn hash() -> String {
        format!("0x{}", "5a".repeat(32))
    }

    #[test]
    fn test_sign_with_keys_two_keys_in_order() {
        let keyring = MultipleKeyring::new(address(), [KEY_1, KEY_2]).unwrap();
        let signatures = keyring
            .sign_with_keys(&hash(), "0x1", KeyRole::TRANSACTION)
            .unwrap();
        assert_eq!(signatures.len(), 2);

        let digest = parse_hash(&hash()).unwrap();
        let expected = [
            PrivateKey::from_hex(KEY_1).unwrap().public_key(),
            PrivateKey::from_hex(KEY_2).unwrap().public_key(),
        ];
        for (signature, public_key) in signatures.iter().zip(expected) {
            assert!(signature.v() == 37 || signature.v() == 38);
            let recovered = signature
                .recover_public_key(&digest, Some(ChainId::new(1)))
                .unwrap();
            assert_eq!(recovered, public_key);
        }
    }

    #[test]
    fn test_get_public_key_preserves_order() {
        let keyring = MultipleKeyring::new(address(), [KEY_2, KEY_1]).unwrap();
        assert_eq!(
            keyring.get_public_key(false),
            vec![
                PrivateKey::from_hex(KEY_2).unwrap().get_public_key(false),
                PrivateKey::from_hex(KEY_1).unwrap().get_public_key(false),
            ]
        );
    }

    #[test]
    fn test_get_key_by_role_invalid() {
        let keyring = MultipleKeyring::new(address(), [KEY_1]).unwrap();
        assert!(matches!(
            keyring.get_key_by_role(KeyRole::new(3)),
            Err(KlaytnError::InvalidRole {
                role: 3,
                role_last: 3
            })
        ));
    }

    #[test]
    fn test_to_account_three_keys() {
        let keys: Vec<_> = (0..3).map(|_| PrivateKey::generate()).collect();
        let keyring = MultipleKeyring::new(address(), keys.clone()).unwrap();
        let account = keyring.to_account(None).unwrap();
        assert_eq!(account.address(), address());

        let AccountKey::WeightedMultiSig(key) = account.account_key() else {
            panic!("expected a weighted multisig key");
        };
        assert_eq!(key.threshold(), 1);
        for (weighted, private_key) in key.weighted_public_keys().iter().zip(&keys) {
            assert_eq!(weighted.weight(), 1);
            assert_eq!(weighted.public_key(), &private_key.public_key());
        }
    }

    #[test]
    fn test_sign_message_without_keys() {
        let mut keyring = MultipleKeyring::new(address(), [KEY_1]).unwrap();
        keyring.set_keys(None::<Vec<PrivateKey>>).unwrap();
        assert!(matches!(
            keyring.sign_message("hello", None, None),
            Err(KlaytnError::NoDefaultKey)
        ));
    }

    #[test]
    fn test_sign_message_role_without_index() {
        let keyring = MultipleKeyring::new(address(), [KEY_1]).unwrap();
        assert!(matches!(
            keyring.sign_message("hello", Some(KeyRole::TRANSACTION), None),
            Err(KlaytnError::IncompleteSigningParams)
        ));
    }
}

mod signing_tests {
    use klaytn_rust_sdk::crypto::{hash_message, parse_hash, PrivateKey, SignatureData};
    use klaytn_rust_sdk::keyring::{KeyRole, KeyringFactory, SingleKeyring};
    use klaytn_rust_sdk::{AbstractKeyring, ChainId, KlaytnError, Network};

    #[test]
    fn test_message_signature_recovers() {
        let keyring = KeyringFactory::generate();
        let signed = keyring.sign_message("0x68656c6c6f", None, None).unwrap();
        assert_eq!(signed.message_hash, hash_message("hello"));
        assert!(signed.signature.v() == 27 || signed.signature.v() == 28);

        let digest = parse_hash(&signed.message_hash).unwrap();
        let recovered = signed.signature.recover_public_key(&digest, None).unwrap();
        assert_eq!(recovered.to_address(), keyring.address());
    }

    #[test]
    fn test_network_as_chain_id() {
        let keyring = KeyringFactory::generate();
        let hash = format!("0x{}", "77".repeat(32));
        let by_network = keyring
            .sign_with_key(&hash, Network::Cypress, KeyRole::TRANSACTION, 0)
            .unwrap();
        let by_number = keyring
            .sign_with_key(&hash, 8217u64, KeyRole::TRANSACTION, 0)
            .unwrap();
        assert_eq!(by_network, by_number);
        assert!(by_network.v() == 8217 * 2 + 35 || by_network.v() == 8217 * 2 + 36);
    }

    #[test]
    fn test_invalid_inputs_never_sign() {
        let keyring = KeyringFactory::generate();
        let hash = format!("0x{}", "77".repeat(32));
        let errors = [
            keyring
                .sign_with_key("77", 1001u64, KeyRole::TRANSACTION, 0)
                .unwrap_err(),
            keyring
                .sign_with_key(&hash, "baobab", KeyRole::TRANSACTION, 0)
                .unwrap_err(),
            keyring.sign_with_key(&hash, 1001u64, None, 0).unwrap_err(),
            keyring
                .sign_with_key(&hash, 1001u64, KeyRole::TRANSACTION, 1)
                .unwrap_err(),
        ];
        assert!(errors.iter().all(KlaytnError::is_signing_input_error));
    }

    #[test]
    fn test_signature_json_shape() {
        let key = PrivateKey::from_hex(
            "0x45a915e4d060149eb4365960e6a7a45f334393093061116b197e3240065ff2d8",
        )
        .unwrap();
        let keyring = SingleKeyring::new(key.derive_address(), key);
        let signature = keyring
            .sign_with_key(&format!("0x{}", "01".repeat(32)), ChainId::baobab(), KeyRole::FEE_PAYER, 0)
            .unwrap();

        let json = serde_json::to_value(&signature).unwrap();
        let parts = json.as_array().unwrap();
        assert_eq!(parts[0], signature.v_hex());
        assert_eq!(parts[0].as_str().unwrap().len() % 2, 0);

        let parsed: SignatureData = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, signature);
    }
}

mod role_based_tests {
    use klaytn_rust_sdk::account::{AccountKey, AccountKeyOptions, WeightedMultiSigOptions};
    use klaytn_rust_sdk::keyring::{KeyRole, KeyringFactory};
    use klaytn_rust_sdk::{AbstractKeyring, Address, Keyring, KlaytnError};

    fn keyring() -> Keyring {
        let role_keys = KeyringFactory::generate_role_based_keys([2, 0, 1]);
        KeyringFactory::create(Address::new([0x11; 20]), role_keys).unwrap()
    }

    #[test]
    fn test_empty_role_falls_back_to_transaction_keys() {
        let keyring = keyring();
        assert_eq!(
            keyring.get_key_by_role(KeyRole::ACCOUNT_UPDATE).unwrap(),
            keyring.get_key_by_role(KeyRole::TRANSACTION).unwrap()
        );
        assert_eq!(keyring.get_key_by_role(KeyRole::FEE_PAYER).unwrap().len(), 1);
        assert!(keyring.is_decoupled());
    }

    #[test]
    fn test_to_account_per_role() {
        let keyring = keyring();
        let options = AccountKeyOptions::from(vec![
            WeightedMultiSigOptions::new(2, vec![1, 1]),
            WeightedMultiSigOptions::empty(),
            WeightedMultiSigOptions::empty(),
        ]);
        let account = keyring.to_account(Some(&options)).unwrap();
        let AccountKey::RoleBased(roles) = account.account_key() else {
            panic!("expected a role-based key");
        };
        assert!(matches!(&roles[0], AccountKey::WeightedMultiSig(key) if key.threshold() == 2));
        assert!(roles[1].is_nil());
        assert!(matches!(roles[2], AccountKey::Public(_)));

        let single = AccountKeyOptions::from(WeightedMultiSigOptions::new(1, vec![1, 1]));
        assert!(matches!(
            keyring.to_account(Some(&single)),
            Err(KlaytnError::InvalidOptionsShape(_))
        ));
    }

    #[test]
    fn test_account_key_json() {
        let account = keyring().to_account(None).unwrap();
        let json = serde_json::to_value(&account).unwrap();
        let roles = json["accountKey"]["key"].as_array().unwrap();
        assert_eq!(roles.len(), 3);
    }
}

mod keystore_tests {
    use klaytn_rust_sdk::keyring::{KeyringFactory, MultipleKeyring, RoleBasedKeyring};
    use klaytn_rust_sdk::keystore::{EncryptOptions, Kdf, Keystore};
    use klaytn_rust_sdk::{AbstractKeyring, Address, Keyring, KlaytnError};
    use serde_json::Value;

    fn fast() -> EncryptOptions {
        EncryptOptions::builder().n(16).build()
    }

    #[test]
    fn test_single_v4_json_shape() {
        let keyring = KeyringFactory::generate();
        let json = keyring.encrypt("password", &fast()).unwrap().to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], 4);
        assert_eq!(value["address"], keyring.address().to_hex());
        let entries = value["keyring"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["cipher"], "aes-128-ctr");
        assert_eq!(entries[0]["kdf"], "scrypt");
        assert_eq!(entries[0]["kdfparams"]["dklen"], 32);
        assert!(value.get("crypto").is_none());
    }

    #[test]
    fn test_oversized_dklen_in_json_is_rejected() {
        let keyring = KeyringFactory::generate();
        let json = keyring.encrypt("password", &fast()).unwrap().to_json().unwrap();
        let mut value: Value = serde_json::from_str(&json).unwrap();
        value["keyring"][0]["kdfparams"]["dklen"] = Value::from(1u64 << 63);

        let keystore = Keystore::from_json(&value.to_string()).unwrap();
        assert!(matches!(
            keystore.decrypt("password"),
            Err(KlaytnError::InvalidKeystore(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_through_factory() {
        let original =
            MultipleKeyring::new(Address::new([0x22; 20]), KeyringFactory::generate_multiple_keys(3))
                .unwrap();
        let json = original.encrypt("password", &fast()).unwrap().to_json().unwrap();
        let keystore = Keystore::from_json(&json).unwrap();
        let restored = KeyringFactory::decrypt(&keystore, "password").unwrap();
        assert_eq!(
            restored.get_public_key(false),
            Keyring::from(original).get_public_key(false)
        );
    }

    #[test]
    fn test_role_based_pbkdf2_roundtrip() {
        let original = RoleBasedKeyring::new(
            Address::new([0x33; 20]),
            KeyringFactory::generate_role_based_keys([1, 2, 0]),
        )
        .unwrap();
        let options = EncryptOptions::builder().kdf(Kdf::Pbkdf2).c(64).build();
        let keystore = original.encrypt("password", &options).unwrap();
        let value: Value = serde_json::from_str(&keystore.to_json().unwrap()).unwrap();
        assert_eq!(value["keyring"][2], Value::Array(vec![]));
        assert_eq!(value["keyring"][1][0]["kdfparams"]["prf"], "hmac-sha256");

        let Keyring::RoleBased(restored) = keystore.decrypt("password").unwrap() else {
            panic!("expected a role-based keyring");
        };
        assert_eq!(restored, original);
    }

    #[test]
    fn test_v3_uppercase_crypto_alias() {
        let keyring = KeyringFactory::generate();
        let keystore = keyring.encrypt_v3("password", &fast()).unwrap();
        let json = keystore.to_json().unwrap().replace("\"crypto\"", "\"Crypto\"");
        let restored = Keystore::from_json(&json).unwrap().decrypt("password").unwrap();
        assert_eq!(restored.as_single(), Some(&keyring));
    }

    #[test]
    fn test_wrong_password_and_version() {
        let keystore = KeyringFactory::generate().encrypt("password", &fast()).unwrap();
        let error = keystore.decrypt("not the password").unwrap_err();
        assert!(error.is_wrong_password());

        let mut value: Value = serde_json::from_str(&keystore.to_json().unwrap()).unwrap();
        value["version"] = Value::from(5);
        let unsupported = Keystore::from_json(&value.to_string()).unwrap();
        assert!(matches!(
            unsupported.decrypt("password"),
            Err(KlaytnError::UnsupportedKeystoreVersion(5))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Keystore::from_json("{\"version\": 4}"),
            Err(KlaytnError::InvalidKeystore(_))
        ));
    }
}

mod copy_tests {
    use klaytn_rust_sdk::crypto::PrivateKey;
    use klaytn_rust_sdk::keyring::MultipleKeyring;
    use klaytn_rust_sdk::{AbstractKeyring, Address};

    #[test]
    fn test_copy_then_mutate() {
        let original = MultipleKeyring::new(
            Address::new([0x44; 20]),
            vec![PrivateKey::generate(), PrivateKey::generate()],
        )
        .unwrap();
        let mut copy = original.copy();
        assert_eq!(copy.address(), original.address());
        assert_eq!(copy.get_public_key(false), original.get_public_key(false));

        copy.set_keys(None::<Vec<PrivateKey>>).unwrap();
        assert!(copy.keys().is_none());
        assert_eq!(original.keys().map(<[PrivateKey]>::len), Some(2));
    }
}

mod property_tests {
    use klaytn_rust_sdk::crypto::{parse_hash, PrivateKey};
    use klaytn_rust_sdk::keyring::{KeyRole, MultipleKeyring};
    use klaytn_rust_sdk::{AbstractKeyring, Address, ChainId, KlaytnError};
    use proptest::prelude::*;

    fn private_key() -> impl Strategy<Value = PrivateKey> {
        prop::array::uniform32(any::<u8>())
            .prop_filter_map("not a valid scalar", |bytes| PrivateKey::from_bytes(&bytes).ok())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_public_key_deterministic(key in private_key()) {
            let parsed = PrivateKey::from_hex(&key.to_hex()).unwrap();
            prop_assert_eq!(parsed.get_public_key(false), key.get_public_key(false));
            prop_assert_eq!(parsed.get_public_key(true), key.get_public_key(true));
        }

        #[test]
        fn prop_public_keys_preserve_order(keys in prop::collection::vec(private_key(), 0..6)) {
            let keyring = MultipleKeyring::new(Address::ZERO, keys.clone()).unwrap();
            let expected: Vec<_> = keys.iter().map(|key| key.get_public_key(false)).collect();
            prop_assert_eq!(keyring.get_public_key(false), expected);
        }

        #[test]
        fn prop_role_insensitive(keys in prop::collection::vec(private_key(), 1..4)) {
            let keyring = MultipleKeyring::new(Address::ZERO, keys).unwrap();
            let transaction = keyring.get_key_by_role(KeyRole::TRANSACTION).unwrap().to_vec();
            for role in KeyRole::all() {
                prop_assert_eq!(keyring.get_key_by_role(role).unwrap(), transaction.as_slice());
            }
        }

        #[test]
        fn prop_out_of_range_index_fails(
            keys in prop::collection::vec(private_key(), 0..4),
            extra in 0usize..8,
        ) {
            let length = keys.len();
            let keyring = MultipleKeyring::new(Address::ZERO, keys).unwrap();
            let hash = format!("0x{}", "aa".repeat(32));
            let result = keyring.sign_with_key(&hash, 1001u64, KeyRole::TRANSACTION, length + extra);
            let is_out_of_range = matches!(result, Err(KlaytnError::IndexOutOfRange { .. }));
            prop_assert!(is_out_of_range);
        }

        #[test]
        fn prop_v_encodes_chain_id(
            key in private_key(),
            digest in prop::array::uniform32(any::<u8>()),
            chain_id in 0u64..100_000,
        ) {
            let hash = format!("0x{}", hex::encode(digest));
            let signature = key.sign(&hash, chain_id).unwrap();
            let recid = signature.v() - 35 - 2 * chain_id;
            prop_assert!(recid <= 1);

            let digest = parse_hash(&hash).unwrap();
            let recovered = signature
                .recover_public_key(&digest, Some(ChainId::new(chain_id)))
                .unwrap();
            prop_assert_eq!(recovered, key.public_key());
        }
    }
}
