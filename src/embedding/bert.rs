use std::path::Path;
use std::sync::Arc;

use candle_core::{DType, Device, IndexOp, Result, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};

/// Encoder weight prefixes seen in published cross-encoder checkpoints.
const ENCODER_PREFIXES: [&str; 2] = ["bert", "roberta"];

struct CrossEncoderHead {
    encoder: BertModel,
    score: Linear,
}

/// BERT encoder with a single-logit relevance head over the `[CLS]` token
/// (e.g. `cross-encoder/ms-marco-MiniLM-L-6-v2`).
#[derive(Clone)]
pub struct BertCrossEncoder(Arc<CrossEncoderHead>);

impl BertCrossEncoder {
    /// Loads `config.json` + `model.safetensors` from `model_dir`.
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let raw = std::fs::read_to_string(model_dir.join("config.json"))?;
        let config: Config = serde_json::from_str(&raw)
            .map_err(|e| candle_core::Error::Msg(format!("invalid config.json: {e}")))?;

        let weights = model_dir.join("model.safetensors");
        // Safety: the file is only mapped read-only for the lifetime of the VarBuilder.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, device)? };

        let encoder_vb = ENCODER_PREFIXES
            .iter()
            .find(|p| vb.contains_tensor(&format!("{p}.embeddings.word_embeddings.weight")))
            .map(|p| vb.pp(*p))
            .unwrap_or_else(|| vb.clone());

        let encoder = BertModel::load(encoder_vb, &config)?;
        let score = candle_nn::linear(config.hidden_size, 1, vb.pp("classifier"))?;
        Ok(Self(Arc::new(CrossEncoderHead { encoder, score })))
    }

    /// Returns raw relevance logits, shape `[batch, 1]`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let hidden = self
            .0
            .encoder
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls = hidden.i((.., 0, ..))?;
        self.0.score.forward(&cls)
    }
}
