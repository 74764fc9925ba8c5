//! Shared fixtures for integration tests.
//!
//! The ONNX models used by the tests are tiny graphs encoded on the fly with `prost`
//! and written into a temporary directory, so no model files are checked in.

#![allow(dead_code)]

use oar_session::core::{Environment, create_environment, init_ort_api};
use prost::Message;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub mod onnx {
    //! The subset of `onnx.proto` the fixtures need. Tags follow the upstream schema.

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct ModelProto {
        #[prost(int64, tag = "1")]
        pub ir_version: i64,
        #[prost(string, tag = "2")]
        pub producer_name: String,
        #[prost(message, optional, tag = "7")]
        pub graph: Option<GraphProto>,
        #[prost(message, repeated, tag = "8")]
        pub opset_import: Vec<OperatorSetIdProto>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct OperatorSetIdProto {
        #[prost(string, tag = "1")]
        pub domain: String,
        #[prost(int64, tag = "2")]
        pub version: i64,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct GraphProto {
        #[prost(message, repeated, tag = "1")]
        pub node: Vec<NodeProto>,
        #[prost(string, tag = "2")]
        pub name: String,
        #[prost(message, repeated, tag = "5")]
        pub initializer: Vec<TensorProto>,
        #[prost(message, repeated, tag = "11")]
        pub input: Vec<ValueInfoProto>,
        #[prost(message, repeated, tag = "12")]
        pub output: Vec<ValueInfoProto>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct NodeProto {
        #[prost(string, repeated, tag = "1")]
        pub input: Vec<String>,
        #[prost(string, repeated, tag = "2")]
        pub output: Vec<String>,
        #[prost(string, tag = "3")]
        pub name: String,
        #[prost(string, tag = "4")]
        pub op_type: String,
        #[prost(message, repeated, tag = "5")]
        pub attribute: Vec<AttributeProto>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct AttributeProto {
        #[prost(string, tag = "1")]
        pub name: String,
        #[prost(int64, tag = "3")]
        pub i: i64,
        #[prost(message, optional, tag = "5")]
        pub t: Option<TensorProto>,
        #[prost(int32, tag = "20")]
        pub r#type: i32,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct TensorProto {
        #[prost(int64, repeated, packed = "false", tag = "1")]
        pub dims: Vec<i64>,
        #[prost(int32, tag = "2")]
        pub data_type: i32,
        #[prost(float, repeated, tag = "4")]
        pub float_data: Vec<f32>,
        #[prost(string, tag = "8")]
        pub name: String,
        #[prost(bytes = "vec", tag = "9")]
        pub raw_data: Vec<u8>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct ValueInfoProto {
        #[prost(string, tag = "1")]
        pub name: String,
        #[prost(message, optional, tag = "2")]
        pub r#type: Option<TypeProto>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct TypeProto {
        #[prost(oneof = "type_proto::Value", tags = "1, 4")]
        pub value: Option<type_proto::Value>,
    }

    pub mod type_proto {
        #[derive(Clone, PartialEq, prost::Oneof)]
        pub enum Value {
            #[prost(message, tag = "1")]
            TensorType(Tensor),
            #[prost(message, tag = "4")]
            SequenceType(Sequence),
        }

        #[derive(Clone, PartialEq, prost::Message)]
        pub struct Tensor {
            #[prost(int32, tag = "1")]
            pub elem_type: i32,
            #[prost(message, optional, tag = "2")]
            pub shape: Option<super::TensorShapeProto>,
        }

        #[derive(Clone, PartialEq, prost::Message)]
        pub struct Sequence {
            #[prost(message, optional, boxed, tag = "1")]
            pub elem_type: Option<Box<super::TypeProto>>,
        }
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct TensorShapeProto {
        #[prost(message, repeated, tag = "1")]
        pub dim: Vec<tensor_shape_proto::Dimension>,
    }

    pub mod tensor_shape_proto {
        #[derive(Clone, PartialEq, prost::Message)]
        pub struct Dimension {
            #[prost(oneof = "dimension::Value", tags = "1, 2")]
            pub value: Option<dimension::Value>,
        }

        pub mod dimension {
            #[derive(Clone, PartialEq, prost::Oneof)]
            pub enum Value {
                #[prost(int64, tag = "1")]
                DimValue(i64),
                #[prost(string, tag = "2")]
                DimParam(String),
            }
        }
    }
}

use onnx::tensor_shape_proto::{Dimension, dimension};
use onnx::type_proto;
use onnx::*;

const IR_VERSION: i64 = 8;
const OPSET_VERSION: i64 = 13;
const FLOAT: i32 = 1;
const INT64: i32 = 7;
const ATTRIBUTE_INT: i32 = 2;
const ATTRIBUTE_TENSOR: i32 = 4;

/// One axis of a fixture tensor.
#[derive(Debug, Clone, Copy)]
pub enum Dim {
    Fixed(i64),
    Named(&'static str),
}

fn tensor_type(elem_type: i32, dims: &[Dim]) -> TypeProto {
    let dim = dims
        .iter()
        .map(|d| Dimension {
            value: Some(match d {
                Dim::Fixed(v) => dimension::Value::DimValue(*v),
                Dim::Named(name) => dimension::Value::DimParam((*name).to_string()),
            }),
        })
        .collect();
    TypeProto {
        value: Some(type_proto::Value::TensorType(type_proto::Tensor {
            elem_type,
            shape: Some(TensorShapeProto { dim }),
        })),
    }
}

fn value_info(name: &str, r#type: TypeProto) -> ValueInfoProto {
    ValueInfoProto {
        name: name.to_string(),
        r#type: Some(r#type),
    }
}

fn float_value(name: &str, dims: &[Dim]) -> ValueInfoProto {
    value_info(name, tensor_type(FLOAT, dims))
}

fn node(op_type: &str, inputs: &[&str], outputs: &[&str]) -> NodeProto {
    NodeProto {
        input: inputs.iter().map(|s| s.to_string()).collect(),
        output: outputs.iter().map(|s| s.to_string()).collect(),
        name: format!("{}_{}", op_type.to_lowercase(), outputs.join("_")),
        op_type: op_type.to_string(),
        attribute: Vec::new(),
    }
}

fn zero_weights(name: &str, rows: i64, cols: i64) -> TensorProto {
    TensorProto {
        dims: vec![rows, cols],
        data_type: FLOAT,
        name: name.to_string(),
        raw_data: vec![0u8; (rows * cols) as usize * std::mem::size_of::<f32>()],
        ..Default::default()
    }
}

fn encode(graph: GraphProto) -> Vec<u8> {
    ModelProto {
        ir_version: IR_VERSION,
        producer_name: "oar-session-tests".to_string(),
        graph: Some(graph),
        opset_import: vec![OperatorSetIdProto {
            domain: String::new(),
            version: OPSET_VERSION,
        }],
    }
    .encode_to_vec()
}

/// `input [1,1,32,32] -> Flatten -> MatMul(W[1024,10]) -> output [1,10]`
pub fn static_model() -> Vec<u8> {
    let mut flatten = node("Flatten", &["input"], &["flat"]);
    flatten.attribute.push(AttributeProto {
        name: "axis".to_string(),
        i: 1,
        r#type: ATTRIBUTE_INT,
        ..Default::default()
    });
    encode(GraphProto {
        name: "static_classifier".to_string(),
        node: vec![flatten, node("MatMul", &["flat", "weights"], &["output"])],
        initializer: vec![zero_weights("weights", 1024, 10)],
        input: vec![float_value(
            "input",
            &[Dim::Fixed(1), Dim::Fixed(1), Dim::Fixed(32), Dim::Fixed(32)],
        )],
        output: vec![float_value("output", &[Dim::Fixed(1), Dim::Fixed(10)])],
    })
}

/// `input [1,1,height,width] -> GlobalAveragePool -> Flatten -> MatMul(W[1,10]) -> output [1,10]`
pub fn dynamic_model() -> Vec<u8> {
    let mut flatten = node("Flatten", &["pooled"], &["flat"]);
    flatten.attribute.push(AttributeProto {
        name: "axis".to_string(),
        i: 1,
        r#type: ATTRIBUTE_INT,
        ..Default::default()
    });
    encode(GraphProto {
        name: "dynamic_classifier".to_string(),
        node: vec![
            node("GlobalAveragePool", &["input"], &["pooled"]),
            flatten,
            node("MatMul", &["flat", "weights"], &["output"]),
        ],
        initializer: vec![zero_weights("weights", 1, 10)],
        input: vec![float_value(
            "input",
            &[
                Dim::Fixed(1),
                Dim::Fixed(1),
                Dim::Named("height"),
                Dim::Named("width"),
            ],
        )],
        output: vec![float_value("output", &[Dim::Fixed(1), Dim::Fixed(10)])],
    })
}

/// A graph with no inputs: `Constant -> constant [1]`
pub fn zero_input_model() -> Vec<u8> {
    let mut constant = node("Constant", &[], &["constant"]);
    constant.attribute.push(AttributeProto {
        name: "value".to_string(),
        t: Some(TensorProto {
            dims: vec![1],
            data_type: FLOAT,
            float_data: vec![1.0],
            ..Default::default()
        }),
        r#type: ATTRIBUTE_TENSOR,
        ..Default::default()
    });
    encode(GraphProto {
        name: "zero_input".to_string(),
        node: vec![constant],
        output: vec![float_value("constant", &[Dim::Fixed(1)])],
        ..Default::default()
    })
}

/// `x [] -> Identity -> y []`
pub fn scalar_model() -> Vec<u8> {
    encode(GraphProto {
        name: "scalar".to_string(),
        node: vec![node("Identity", &["x"], &["y"])],
        input: vec![float_value("x", &[])],
        output: vec![float_value("y", &[])],
        ..Default::default()
    })
}

/// Two independent pass-throughs, declared `a [2,3]` then `b [4]`.
pub fn two_input_model() -> Vec<u8> {
    encode(GraphProto {
        name: "two_inputs".to_string(),
        node: vec![
            node("Identity", &["a"], &["a_out"]),
            node("Identity", &["b"], &["b_out"]),
        ],
        input: vec![
            float_value("a", &[Dim::Fixed(2), Dim::Fixed(3)]),
            float_value("b", &[Dim::Fixed(4)]),
        ],
        output: vec![
            float_value("a_out", &[Dim::Fixed(2), Dim::Fixed(3)]),
            float_value("b_out", &[Dim::Fixed(4)]),
        ],
        ..Default::default()
    })
}

/// `items: seq(tensor(float)) -> SequenceLength -> length []`
pub fn sequence_input_model() -> Vec<u8> {
    let sequence = TypeProto {
        value: Some(type_proto::Value::SequenceType(type_proto::Sequence {
            elem_type: Some(Box::new(tensor_type(FLOAT, &[Dim::Named("n")]))),
        })),
    };
    encode(GraphProto {
        name: "sequence_input".to_string(),
        node: vec![node("SequenceLength", &["items"], &["length"])],
        input: vec![value_info("items", sequence)],
        output: vec![value_info("length", tensor_type(INT64, &[]))],
        ..Default::default()
    })
}

/// Fixture models available to tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelType {
    Static,
    Dynamic,
    ZeroInput,
    Scalar,
    TwoInput,
    SequenceInput,
}

impl ModelType {
    pub fn file_name(self) -> &'static str {
        match self {
            ModelType::Static => "static.onnx",
            ModelType::Dynamic => "dynamic.onnx",
            ModelType::ZeroInput => "zero_input.onnx",
            ModelType::Scalar => "scalar.onnx",
            ModelType::TwoInput => "two_input.onnx",
            ModelType::SequenceInput => "sequence_input.onnx",
        }
    }

    pub fn bytes(self) -> Vec<u8> {
        match self {
            ModelType::Static => static_model(),
            ModelType::Dynamic => dynamic_model(),
            ModelType::ZeroInput => zero_input_model(),
            ModelType::Scalar => scalar_model(),
            ModelType::TwoInput => two_input_model(),
            ModelType::SequenceInput => sequence_input_model(),
        }
    }
}

/// Writes fixture models into a temporary directory that lives as long as the manager.
pub struct ModelFileManager {
    dir: TempDir,
}

impl ModelFileManager {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create fixture directory"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Path to the fixture, writing it on first use.
    pub fn model(&self, model: ModelType) -> PathBuf {
        let path = self.root().join(model.file_name());
        if !path.exists() {
            std::fs::write(&path, model.bytes()).expect("write fixture model");
        }
        path
    }

    /// Writes arbitrary bytes under `name` and returns the path.
    pub fn write_raw(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.root().join(name);
        std::fs::write(&path, bytes).expect("write fixture file");
        path
    }
}

/// Initializes the runtime and returns a fresh environment.
pub fn environment(name: &str) -> Environment {
    init_ort_api().expect("initialize ONNX Runtime");
    create_environment(name).expect("create environment")
}
