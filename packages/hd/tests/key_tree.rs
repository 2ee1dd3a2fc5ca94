//! End-to-end key tree scenarios

use cryypt_hd::{
    ByteInput, ChildIndex, DerivationPath, Deriver, Domain, HdError, IndexInput, IndexMode,
    calc_salt, derive_child, derive_master, derive_path, fingerprint, get_index, str_to_index,
    verify_fp,
};
use hex_literal::hex;
use serde_json::json;

const ZERO_SECRET: [u8; 32] = [0u8; 32];

#[test]
fn zero_secret_children_are_reproducible() -> cryypt_hd::Result<()> {
    let master = derive_master(ZERO_SECRET)?;
    let first = derive_child(&master, 0u32)?;
    let second = derive_child(&master, 0u32)?;

    assert_eq!(first, second);
    assert_eq!(first.key(), second.key());
    assert_eq!(first.code(), second.code());
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.path(), "m/0");
    assert_eq!(second.path(), "m/0");
    Ok(())
}

#[test]
fn zero_secret_known_answers() -> cryypt_hd::Result<()> {
    let master = derive_master(ZERO_SECRET)?;
    assert_eq!(
        master.key().as_slice(),
        hex!("6dd434ce9dfbc9636da42a26d0844f2c8581b7880192f490262417189fda65d9")
    );
    assert_eq!(
        master.code().as_slice(),
        hex!("ec901ffe95431644f238aa3d2b211638c94dd5a522934adba970661707962adb")
    );
    assert_eq!(
        master.fingerprint().as_slice(),
        hex!("6c501ca379a4977e2f6b3481c0af846d")
    );

    let child = derive_child(&master, 0u32)?;
    assert_eq!(
        child.key().as_slice(),
        hex!("68f21eca96aaf7e02685bd16b7558bcfdac26cea2d685a176cce7c8fea8302f8")
    );
    assert_eq!(
        child.code().as_slice(),
        hex!("052f1b15cacf5c6e5a2d6689b0f6743843049806a526665b08ce5e5d2c1d1ed3")
    );
    assert_eq!(
        child.fingerprint().as_slice(),
        hex!("ceaa29d60d96f3adfd8f5670de38ef06")
    );
    Ok(())
}

#[test]
fn hex_secret_equals_raw_bytes() -> cryypt_hd::Result<()> {
    let from_hex = derive_master("000102030405060708090a0b0c0d0e0f")?;
    let from_bytes = derive_master(hex!("000102030405060708090a0b0c0d0e0f"))?;
    assert_eq!(from_hex, from_bytes);

    // odd length is text, not hex
    let text = derive_master("000")?;
    assert_eq!(text, derive_master(b"000".to_vec())?);
    Ok(())
}

#[test]
fn master_fingerprint_is_bound_to_the_secret() -> cryypt_hd::Result<()> {
    let master = derive_master(ZERO_SECRET)?;
    assert_eq!(*master.fingerprint(), fingerprint(&ZERO_SECRET, master.key())?);
    assert_ne!(*master.fingerprint(), fingerprint(&[1u8; 32], master.key())?);
    Ok(())
}

#[test]
fn chain_code_does_not_enter_the_fingerprint() -> cryypt_hd::Result<()> {
    let master = derive_master(ZERO_SECRET)?;
    let child = derive_child(&master, 3u32)?;
    assert_eq!(*child.fingerprint(), fingerprint(master.key(), child.key())?);
    assert_ne!(*child.fingerprint(), fingerprint(master.code(), child.key())?);
    Ok(())
}

#[test]
fn lineage_only_spans_one_generation() -> cryypt_hd::Result<()> {
    let master = derive_master("secret")?;
    let child = master.derive(1u32)?;
    let grandchild = child.derive(2u32)?;

    assert!(grandchild.lineage(&child));
    assert!(child.lineage(&master));
    assert!(!grandchild.lineage(&master));
    assert!(!master.lineage(&child));
    Ok(())
}

#[test]
fn children_from_another_domain_fail_verification() -> cryypt_hd::Result<()> {
    let master = derive_master("secret")?;
    let child = master.derive(7u32)?;
    assert!(verify_fp(&child, &master));

    for prefix in ["vault", "session"] {
        let deriver = Deriver::new(Domain::with_prefix(prefix));
        let foreign = deriver.child(&master, 7u32)?;
        assert!(!verify_fp(&foreign, &master));
        assert!(deriver.verify(&foreign, &master));
    }
    Ok(())
}

#[test]
fn path_strings_resolve_names_and_numbers() -> cryypt_hd::Result<()> {
    let master = derive_master(ZERO_SECRET)?;
    let leaf = master.derive_path_str("m/42/account/0")?;

    let path: DerivationPath = "m/42/account/0".parse()?;
    assert_eq!(leaf, derive_path(&master, &path)?);
    assert_eq!(leaf.depth(), 3);
    assert_eq!(leaf.path(), format!("m/42/{}/0", str_to_index("account")?));
    assert_eq!(leaf.path(), path.to_string());
    Ok(())
}

#[test]
fn path_derivation_can_start_below_the_master() -> cryypt_hd::Result<()> {
    let master = derive_master(ZERO_SECRET)?;
    let account = master.derive(5u32)?;
    let idx = |n: u32| ChildIndex::try_from(n);

    let leaf = derive_path(&account, &[idx(1)?, idx(2)?])?;
    assert_eq!(leaf.path(), "m/5/1/2");
    assert_eq!(leaf, derive_path(&master, &[idx(5)?, idx(1)?, idx(2)?])?);
    Ok(())
}

#[test]
fn index_resolution_boundaries() {
    assert_eq!(
        get_index("2147483647", IndexMode::Num).map(ChildIndex::value),
        Ok(2_147_483_647)
    );
    assert!(matches!(
        get_index("2147483648", IndexMode::Num),
        Err(HdError::IndexOutOfRange(_))
    ));
    assert!(matches!(
        "bogus".parse::<IndexMode>(),
        Err(HdError::InvalidMode(_))
    ));
}

#[test]
fn name_hashing_is_stable() -> cryypt_hd::Result<()> {
    let first = str_to_index("account")?;
    for _ in 0..8 {
        assert_eq!(str_to_index("account")?, first);
    }
    assert!(first.value() <= ChildIndex::MAX);
    assert_eq!(first.value(), 1_324_500_506);
    Ok(())
}

#[test]
fn dynamic_inputs_are_type_checked() -> cryypt_hd::Result<()> {
    let secret = ByteInput::try_from(&json!("00ff"))?;
    let master = derive_master(secret)?;

    let index = IndexInput::try_from(&json!(12))?;
    assert_eq!(derive_child(&master, index)?.path(), "m/12");

    assert!(matches!(
        ByteInput::try_from(&json!({"secret": 1})),
        Err(HdError::InvalidInputType(_))
    ));
    assert!(matches!(
        IndexInput::try_from(&json!(true)),
        Err(HdError::InvalidIndex(_))
    ));
    Ok(())
}

#[test]
fn salt_is_self_describing() -> cryypt_hd::Result<()> {
    let salt = calc_salt(&ZERO_SECRET)?;
    assert_eq!(&salt[..17], b"symmetric_hd/salt");
    assert_eq!(salt.len(), 33);
    assert_eq!(
        salt,
        hex!("73796d6d65747269635f68642f73616c74d0ed17f79322a2bf93b3b38468ff67d7")
    );
    Ok(())
}

#[test]
fn records_are_shareable_across_threads() -> cryypt_hd::Result<()> {
    let master = derive_master(ZERO_SECRET)?;
    let expected = master.derive(9u32)?;

    let master = &master;
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(move || master.derive(9u32)))
            .collect();
        for handle in handles {
            let child = handle.join().expect("derivation thread panicked");
            assert_eq!(child, Ok(expected.clone()));
        }
    });
    Ok(())
}
