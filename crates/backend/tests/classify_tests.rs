use backend::{InferError, classify, is_ir_file};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_pair_in_order_unchanged() {
    assert_eq!(
        classify(&names(&["model.xml", "model.bin"])).unwrap(),
        names(&["model.xml", "model.bin"])
    );
}

#[test]
fn test_reversed_pair_is_reordered() {
    assert_eq!(
        classify(&names(&["model.bin", "model.xml"])).unwrap(),
        names(&["model.xml", "model.bin"])
    );
}

#[test]
fn test_pair_extensions_case_insensitive() {
    for (a, b) in [
        ("m.BIN", "m.XML"),
        ("m.Bin", "m.xMl"),
        ("weights.bin", "Topology.XML"),
        ("dir/x.bin", "other/y.xml"),
    ] {
        let forward = classify(&names(&[a, b])).unwrap();
        let backward = classify(&names(&[b, a])).unwrap();
        assert_eq!(forward, names(&[b, a]));
        assert_eq!(backward, names(&[b, a]));
    }
}

#[test]
fn test_identity_for_everything_else() {
    let cases: Vec<Vec<String>> = vec![
        names(&[]),
        names(&["model.onnx"]),
        names(&["model.xml"]),
        names(&["model.bin"]),
        names(&["model.onnx", "model.onnx_data"]),
        names(&["model.bin", "model.onnx"]),
        names(&["a.bin", "a.xml", "extra.txt"]),
        names(&["model.xml", "model.bin", "model.mapping"]),
        names(&[".bin", ".xml"]),
        names(&["model.xml.bak", "model.bin"]),
    ];
    for case in cases {
        assert_eq!(classify(&case).unwrap(), case, "case {:?}", case);
    }
}

#[test]
fn test_two_topology_files_rejected() {
    let result = classify(&names(&["a.xml", "b.XML"]));
    match result {
        Err(InferError::InvalidFileSet(files)) => assert_eq!(files, names(&["a.xml", "b.XML"])),
        other => panic!("expected InvalidFileSet, got {:?}", other),
    }
}

#[test]
fn test_two_weight_files_rejected() {
    assert!(matches!(
        classify(&names(&["a.bin", "b.bin"])),
        Err(InferError::InvalidFileSet(_))
    ));
}

#[test]
fn test_is_ir_file() {
    assert!(is_ir_file("model.xml"));
    assert!(is_ir_file("MODEL.BIN"));
    assert!(!is_ir_file("model.onnx"));
    assert!(!is_ir_file(".xml"));
}
