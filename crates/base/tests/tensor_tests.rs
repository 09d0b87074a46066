use base::{ElementType, TensorData, TensorError, TensorValue, element_count};

#[test]
fn test_tensor_new_valid() {
    let tensor = TensorValue::from_f32(vec![1, 3], vec![1.0, 2.0, 3.0]).unwrap();
    assert_eq!(tensor.shape(), &[1, 3]);
    assert_eq!(tensor.element_type(), ElementType::Float32);
    assert_eq!(tensor.as_f32(), Some(&[1.0, 2.0, 3.0][..]));
    assert_eq!(tensor.as_i64(), None);
}

#[test]
fn test_tensor_new_shape_mismatch() {
    let result = TensorValue::from_i64(vec![2, 3], vec![1, 2, 3]);
    assert_eq!(
        result.unwrap_err(),
        TensorError::ShapeMismatch {
            expected: 6,
            got: 3
        }
    );
}

#[test]
fn test_tensor_new_overflow() {
    let result = TensorValue::from_f32(vec![usize::MAX, 2], vec![]);
    assert!(matches!(result, Err(TensorError::ShapeOverflow)));
}

#[test]
fn test_tensor_scalar() {
    let tensor = TensorValue::scalar(TensorData::Int64(vec![42])).unwrap();
    assert_eq!(tensor.ndim(), 0);
    assert_eq!(tensor.len(), 1);
    assert!(TensorValue::scalar(TensorData::Int64(vec![])).is_err());
}

#[test]
fn test_tensor_zero_sized_dimension() {
    let tensor = TensorValue::from_bool(vec![4, 0], vec![]).unwrap();
    assert!(tensor.is_empty());
    assert_eq!(tensor.element_type(), ElementType::Bool);
}

#[test]
fn test_element_type_follows_data() {
    let cases = [
        (TensorData::Int64(vec![1]), ElementType::Int64, "int64"),
        (TensorData::Float32(vec![1.0]), ElementType::Float32, "float32"),
        (TensorData::Bool(vec![true]), ElementType::Bool, "bool"),
        (TensorData::Int32(vec![1]), ElementType::Int32, "int32"),
        (TensorData::Float64(vec![1.0]), ElementType::Float64, "float64"),
        (TensorData::Uint8(vec![1]), ElementType::Uint8, "uint8"),
        (TensorData::String(vec!["a".into()]), ElementType::String, "string"),
    ];
    for (data, expected, name) in cases {
        let tensor = TensorValue::new(vec![1], data).unwrap();
        assert_eq!(tensor.element_type(), expected);
        assert_eq!(expected.to_string(), name);
    }
}

#[test]
fn test_into_parts() {
    let tensor = TensorValue::from_i64(vec![2], vec![7, 8]).unwrap();
    let (shape, data) = tensor.into_parts();
    assert_eq!(shape, vec![2]);
    assert_eq!(data, TensorData::Int64(vec![7, 8]));
}

#[test]
fn test_element_count() {
    assert_eq!(element_count(&[]), Ok(1));
    assert_eq!(element_count(&[2, 3, 4]), Ok(24));
    assert_eq!(element_count(&[usize::MAX, 3]), Err(TensorError::ShapeOverflow));
}

#[test]
fn test_debug_includes_type_and_shape() {
    let tensor = TensorValue::from_f32(vec![2], vec![0.5, 1.5]).unwrap();
    let debug = format!("{:?}", tensor);
    assert!(debug.contains("Float32"));
    assert!(debug.contains("[2]"));
}
