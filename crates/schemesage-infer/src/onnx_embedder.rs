//! ONNX-based sentence embedder (paraphrase-MiniLM-L6-v2 export).
//!
//! Loads a SentenceTransformers ONNX model and tokenizer and mean-pools the
//! token embeddings into one 384-dim vector per text. Requires the `onnx`
//! feature.

#[cfg(feature = "onnx")]
mod inner {
    use std::path::Path;

    use ndarray::Array1;
    use ort::session::Session;
    use ort::value::Tensor;
    use parking_lot::Mutex;
    use schemesage_core::{Error, Result};
    use tokenizers::Tokenizer;
    use tracing::info;

    use crate::embedder::EmbedderBackend;

    /// Maximum sequence length for the model.
    const MAX_SEQ_LEN: usize = 512;

    pub struct OnnxEmbedder {
        /// ort sessions need `&mut` to run; requests take turns.
        session: Mutex<Session>,
        tokenizer: Tokenizer,
        dimension: usize,
        name: String,
    }

    fn inference_err<E: std::fmt::Display>(context: &str) -> impl Fn(E) -> Error + '_ {
        move |e| Error::Inference(format!("{context}: {e}"))
    }

    impl OnnxEmbedder {
        /// Load an ONNX model and tokenizer from the given directory.
        ///
        /// Expects `model_dir/model.onnx` and `model_dir/tokenizer.json`.
        /// The output dimension is probed by embedding a short sentence.
        pub fn load(model_dir: &Path) -> Result<Self> {
            let model_path = model_dir.join("model.onnx");
            let tokenizer_path = model_dir.join("tokenizer.json");

            if !model_path.exists() {
                return Err(Error::Inference(format!("Model not found: {}", model_path.display())));
            }
            if !tokenizer_path.exists() {
                return Err(Error::Inference(format!(
                    "Tokenizer not found: {}",
                    tokenizer_path.display()
                )));
            }

            // With load-dynamic, ORT_DYLIB_PATH must point to libonnxruntime
            ort::init().commit();

            let session = Session::builder()
                .map_err(inference_err("Failed to create session builder"))?
                .with_intra_threads(2)
                .map_err(inference_err("Failed to set threads"))?
                .commit_from_file(&model_path)
                .map_err(inference_err("Failed to load ONNX model"))?;

            let tokenizer = Tokenizer::from_file(&tokenizer_path)
                .map_err(|e| Error::Inference(format!("Failed to load tokenizer: {e}")))?;

            let name = model_dir
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("onnx")
                .to_string();

            let mut embedder = Self {
                session: Mutex::new(session),
                tokenizer,
                dimension: 0,
                name,
            };
            embedder.dimension = embedder.infer("dimension probe")?.len();

            info!(
                "ONNX embedder loaded: dim={}, model={}",
                embedder.dimension,
                model_path.display()
            );
            Ok(embedder)
        }

        fn infer(&self, text: &str) -> Result<Array1<f32>> {
            let encoding = self
                .tokenizer
                .encode(text, true)
                .map_err(|e| Error::Inference(format!("Tokenization failed: {e}")))?;

            let seq_len = encoding.get_ids().len().min(MAX_SEQ_LEN);
            let input_ids = &encoding.get_ids()[..seq_len];
            let attention_mask = &encoding.get_attention_mask()[..seq_len];

            let ids_data: Vec<i64> = input_ids.iter().map(|&id| id as i64).collect();
            let mask_data: Vec<i64> = attention_mask.iter().map(|&m| m as i64).collect();
            let type_ids_data: Vec<i64> = vec![0i64; seq_len];

            let ids_tensor = Tensor::from_array(([1usize, seq_len], ids_data))
                .map_err(inference_err("Failed to create ids tensor"))?;
            let mask_tensor = Tensor::from_array(([1usize, seq_len], mask_data))
                .map_err(inference_err("Failed to create mask tensor"))?;
            let type_ids_tensor = Tensor::from_array(([1usize, seq_len], type_ids_data))
                .map_err(inference_err("Failed to create type_ids tensor"))?;

            let mut session = self.session.lock();
            let outputs = session
                .run(ort::inputs![ids_tensor, mask_tensor, type_ids_tensor])
                .map_err(inference_err("ONNX inference failed"))?;

            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(inference_err("Failed to extract output tensor"))?;
            let dims: Vec<i64> = shape.iter().copied().collect();

            match dims.as_slice() {
                // Token embeddings [1, seq_len, dim]: mean pooling over the mask
                [1, _, dim] => {
                    let dim = *dim as usize;
                    let mask_sum: f32 = attention_mask.iter().map(|&m| m as f32).sum();
                    if mask_sum < 1e-9 {
                        return Err(Error::Inference("empty attention mask".into()));
                    }
                    let mut pooled = Array1::<f32>::zeros(dim);
                    for (i, &m) in attention_mask.iter().enumerate() {
                        if m > 0 {
                            let offset = i * dim;
                            for d in 0..dim {
                                pooled[d] += data[offset + d];
                            }
                        }
                    }
                    Ok(pooled / mask_sum)
                }
                // Already pooled [1, dim]
                [1, dim] => Ok(Array1::from_vec(data[..*dim as usize].to_vec())),
                other => Err(Error::Inference(format!("Unexpected output shape: {other:?}"))),
            }
        }
    }

    impl EmbedderBackend for OnnxEmbedder {
        fn encode(&self, text: &str) -> Result<Array1<f32>> {
            self.infer(text)
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        fn name(&self) -> &str {
            &self.name
        }
    }
}

#[cfg(feature = "onnx")]
pub use inner::OnnxEmbedder;
