//! These tests need `libopenvino_c`; they pass trivially when it cannot be loaded.

use openvino::{Core, ElementType, OpenVino, Tensor};
use std::sync::Arc;

const RELU_IR: &str = r#"<?xml version="1.0"?>
<net name="relu" version="11">
    <layers>
        <layer id="0" name="input" type="Parameter" version="opset1">
            <data shape="1,4" element_type="f32"/>
            <output>
                <port id="0" precision="FP32" names="input">
                    <dim>1</dim>
                    <dim>4</dim>
                </port>
            </output>
        </layer>
        <layer id="1" name="relu" type="Relu" version="opset1">
            <input>
                <port id="0" precision="FP32">
                    <dim>1</dim>
                    <dim>4</dim>
                </port>
            </input>
            <output>
                <port id="1" precision="FP32" names="output">
                    <dim>1</dim>
                    <dim>4</dim>
                </port>
            </output>
        </layer>
        <layer id="2" name="output/sink_port_0" type="Result" version="opset1">
            <input>
                <port id="0" precision="FP32">
                    <dim>1</dim>
                    <dim>4</dim>
                </port>
            </input>
        </layer>
    </layers>
    <edges>
        <edge from-layer="0" from-port="0" to-layer="1" to-port="0"/>
        <edge from-layer="1" from-port="1" to-layer="2" to-port="0"/>
    </edges>
</net>
"#;

fn openvino() -> Option<Arc<OpenVino>> {
    match OpenVino::load() {
        Ok(ov) => Some(ov),
        Err(err) => {
            eprintln!("skipping: {}", err);
            None
        }
    }
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

#[test]
fn test_model_port_names() {
    let Some(ov) = openvino() else { return };
    let core = Core::new(ov).unwrap();
    let model = core.read_model_from_memory(RELU_IR.as_bytes(), None).unwrap();
    assert_eq!(model.input_names().unwrap(), vec!["input".to_string()]);
    assert_eq!(model.output_names().unwrap(), vec!["output".to_string()]);
}

#[test]
fn test_relu_inference_on_cpu() {
    let Some(ov) = openvino() else { return };
    let core = Core::new(ov.clone()).unwrap();
    let model = core.read_model_from_memory(RELU_IR.as_bytes(), None).unwrap();
    let compiled = core.compile_model(&model, "CPU").unwrap();
    let mut request = compiled.create_infer_request().unwrap();

    let bytes = f32_bytes(&[-1.0, 2.0, -3.0, 4.0]);
    let input = Tensor::new(&ov, ElementType::F32, &[1, 4], &bytes).unwrap();
    request.set_tensor("input", &input).unwrap();
    drop(input);
    request.infer().unwrap();

    let output = request.get_tensor("output").unwrap();
    assert_eq!(output.element_type().unwrap(), ElementType::F32);
    assert_eq!(output.shape().unwrap(), vec![1, 4]);
    assert_eq!(output.to_bytes().unwrap(), f32_bytes(&[0.0, 2.0, 0.0, 4.0]));
}

#[test]
fn test_tensor_rejects_wrong_byte_count() {
    let Some(ov) = openvino() else { return };
    assert!(Tensor::new(&ov, ElementType::F32, &[2, 2], &[0u8; 15]).is_err());
}

#[test]
fn test_read_model_bad_path_reports_status() {
    let Some(ov) = openvino() else { return };
    let core = Core::new(ov).unwrap();
    let err = core
        .read_model(std::path::Path::new("/nonexistent/model.xml"), None)
        .err()
        .unwrap();
    assert!(err.status().is_some());
}

#[test]
fn test_unknown_device_fails_to_compile() {
    let Some(ov) = openvino() else { return };
    let core = Core::new(ov).unwrap();
    let model = core.read_model_from_memory(RELU_IR.as_bytes(), None).unwrap();
    assert!(core.compile_model(&model, "NO_SUCH_DEVICE").is_err());
}
