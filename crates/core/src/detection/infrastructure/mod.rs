pub mod model_resolver;
pub mod onnx_detector_loader;
pub mod onnx_expression_detector;
