use epc::epc::{decode_binary, Epc, EpcValue, Giai, GiaiScheme, Grai, GraiScheme, Sgln, SglnScheme, Sgtin, SgtinScheme, Sscc};
use epc::error::EpcError;

// Examples from the GS1 EPC Tag Data Standard's worked examples (E.3).
#[test]
fn sgtin96_decodes_and_round_trips() {
    let value = decode_binary("3074257BF7194E4000001A85").unwrap();
    assert_eq!(value.to_uri(), "urn:epc:id:sgtin:0614141.812345.6789");
    assert_eq!(value.to_tag_uri(), "urn:epc:tag:sgtin-96:3.0614141.812345.6789");
    assert_eq!(value.get_binary().unwrap(), "3074257BF7194E4000001A85");

    let sgtin = match value {
        EpcValue::Sgtin(s) => s,
        _ => panic!("expected SGTIN"),
    };
    assert_eq!(sgtin.company_prefix(), "0614141");
    assert_eq!(sgtin.serial(), "6789");
    assert_eq!(sgtin.scheme(), SgtinScheme::Sgtin96);
}

#[test]
fn sgtin198_decodes_an_alphanumeric_serial() {
    let value = decode_binary("3674257BF6B7A659B2C2BF100000000000000000000000000000").unwrap();
    assert_eq!(value.to_uri(), "urn:epc:id:sgtin:0614141.712345.32a%2Fb");
    assert_eq!(value.to_tag_uri(), "urn:epc:tag:sgtin-198:3.0614141.712345.32a%2Fb");
    assert_eq!(
        value.get_binary().unwrap(),
        "3674257BF6B7A659B2C2BF100000000000000000000000000000"
    );

    let sgtin = match value {
        EpcValue::Sgtin(s) => s,
        _ => panic!("expected SGTIN"),
    };
    assert_eq!(sgtin.serial(), "32a/b");
    assert_eq!(sgtin.scheme(), SgtinScheme::Sgtin198);
}

#[test]
fn sgtin198_tag_uri_produces_the_literal_binary() {
    let sgtin = Sgtin::create_from_tag_uri("urn:epc:tag:sgtin-198:3.0614141.712345.32a%2Fb").unwrap();
    assert_eq!(
        sgtin.get_binary().unwrap(),
        "3674257BF6B7A659B2C2BF100000000000000000000000000000"
    );
}

#[test]
fn sscc96_decodes_and_round_trips() {
    let value = decode_binary("3174257BF4499602D2000000").unwrap();
    assert_eq!(value.to_uri(), "urn:epc:id:sscc:0614141.1234567890");
    assert_eq!(value.to_tag_uri(), "urn:epc:tag:sscc-96:3.0614141.1234567890");
    assert_eq!(value.get_binary().unwrap(), "3174257BF4499602D2000000");
}

#[test]
fn sgln195_tag_uri_produces_the_literal_binary() {
    let sgln = Sgln::create_from_tag_uri("urn:epc:tag:sgln-195:3.0614141.12345.32a%2Fb").unwrap();
    assert_eq!(
        sgln.get_binary().unwrap(),
        "3974257BF46072CD9615F8800000000000000000000000000"
    );
}

#[test]
fn grai96_tag_uri_produces_the_literal_binary() {
    let grai = Grai::create_from_tag_uri("urn:epc:tag:grai-96:3.0614141.12345.5678").unwrap();
    assert_eq!(grai.get_binary().unwrap(), "3374257BF40C0E400000162E");
}

#[test]
fn giai202_tag_uri_produces_the_literal_binary() {
    let giai = Giai::create_from_tag_uri("urn:epc:tag:giai-202:3.0614141.32a%2Fb").unwrap();
    assert_eq!(
        giai.get_binary().unwrap(),
        "3874257BF59B2C2BF10000000000000000000000000000000000"
    );
}

#[test]
fn every_family_round_trips_through_all_four_representations() {
    let sgtin = Sgtin::create("0614141", "812345", "6789").unwrap();
    assert_eq!(Sgtin::create_from_uri(&sgtin.to_uri()).unwrap(), sgtin);
    assert_eq!(Sgtin::create_from_binary(&sgtin.get_binary().unwrap()).unwrap(), sgtin);

    let sscc = Sscc::create("0614141", "123456789").unwrap();
    assert_eq!(Sscc::create_from_uri(&sscc.to_uri()).unwrap(), sscc);
    assert_eq!(Sscc::create_from_binary(&sscc.get_binary().unwrap()).unwrap(), sscc);

    let sgln = Sgln::create("0614141", "12345", "400").unwrap();
    assert_eq!(Sgln::create_from_uri(&sgln.to_uri()).unwrap(), sgln);
    assert_eq!(Sgln::create_from_binary(&sgln.get_binary().unwrap()).unwrap(), sgln);

    let grai = Grai::create("0614141", "12345", "400").unwrap();
    assert_eq!(Grai::create_from_uri(&grai.to_uri()).unwrap(), grai);
    assert_eq!(Grai::create_from_binary(&grai.get_binary().unwrap()).unwrap(), grai);

    let giai = Giai::create("0614141", "32a/b").unwrap();
    assert_eq!(Giai::create_from_uri(&giai.to_uri()).unwrap(), giai);
    assert_eq!(Giai::create_from_binary(&giai.get_binary().unwrap()).unwrap(), giai);
}

#[test]
fn sgtin96_serial_overflow_is_invalid_serial_not_invalid_argument() {
    let mut sgtin = Sgtin::create("0614141", "812345", "274877906944").unwrap();
    sgtin.set_scheme(SgtinScheme::Sgtin96).unwrap();
    assert!(matches!(sgtin.get_binary(), Err(EpcError::InvalidSerial(_))));
}

#[test]
fn giai_rejects_a_serial_alphabet_violation_as_invalid_argument() {
    let err = Giai::create("0614141", "32a%2Fb\x20").unwrap_err();
    assert!(matches!(err, EpcError::InvalidArgument(_)));
}

#[test]
fn wrong_length_binary_is_invalid_argument() {
    let err = Sgtin::create_from_binary("3074257BF7194E4000001A").unwrap_err();
    assert!(matches!(err, EpcError::InvalidArgument(_)));
}

#[test]
fn decode_binary_rejects_out_of_scope_header() {
    // 0x2D is GSRN-96, a header this crate doesn't implement.
    assert!(decode_binary("2D0000000000000000000000").is_err());
}

#[test]
fn tag_uri_filter_above_seven_is_rejected() {
    assert!(Sgtin::create_from_tag_uri("urn:epc:tag:sgtin-96:9.0614141.812345.6789").is_err());
    assert!(Sscc::create_from_tag_uri("urn:epc:tag:sscc-96:8.0614141.123456789").is_err());
}

#[test]
fn grai170_round_trips_an_alphanumeric_serial() {
    let mut grai = Grai::create("0614141", "12345", "a1-B2").unwrap();
    grai.set_scheme(GraiScheme::Grai170).unwrap();
    let hex = grai.get_binary().unwrap();
    let decoded = Grai::create_from_binary(&hex).unwrap();
    assert_eq!(decoded.serial(), "a1-B2");
}

#[test]
fn sgln195_round_trips_an_alphanumeric_extension() {
    let mut sgln = Sgln::create("0614141", "12345", "dock-7").unwrap();
    sgln.set_scheme(SglnScheme::Sgln195).unwrap();
    let hex = sgln.get_binary().unwrap();
    let decoded = Sgln::create_from_binary(&hex).unwrap();
    assert_eq!(decoded.extension(), "dock-7");
}

#[test]
fn giai202_round_trips_an_alphanumeric_asset_reference() {
    let mut giai = Giai::create("0614141", "forklift-9").unwrap();
    giai.set_scheme(GiaiScheme::Giai202).unwrap();
    let hex = giai.get_binary().unwrap();
    let decoded = Giai::create_from_binary(&hex).unwrap();
    assert_eq!(decoded.asset_reference(), "forklift-9");
}
