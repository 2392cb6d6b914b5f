//! ONNX Runtime sequence classifier for HuggingFace-exported text models.
//!
//! The model resource (`model.onnx` by default) must sit next to a
//! `tokenizer.json`. Label names come from `config.json` (`id2label`), or from
//! `labels.txt` with one label per line, or default to `LABEL_{i}`.

use std::collections::BTreeMap;
use std::path::Path;

use ort::session::Session;
use ort::value::Tensor;
use serde::Deserialize;
use textclass_core::Category;
use tokenizers::Tokenizer;
use tracing::info;

use crate::context::AssetContext;
use crate::engine::Engine;

const MAX_SEQ_LEN: usize = 256;

/// Subset of a HuggingFace `config.json` relevant to classification heads.
#[derive(Debug, Default, Deserialize)]
struct HeadConfig {
    #[serde(default)]
    id2label: BTreeMap<String, String>,
    #[serde(default)]
    problem_type: Option<String>,
}

/// Text classifier backed by an ONNX Runtime session.
///
/// Produces one [`Category`] per label, in label-index order. Scores are
/// softmax probabilities, or independent sigmoids for multi-label heads.
pub struct OnnxClassifier {
    session: Session,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    multi_label: bool,
    feeds_token_type_ids: bool,
}

impl OnnxClassifier {
    /// Load a classifier from a model file. Companion files are read from the
    /// model's directory.
    pub fn load(model_path: &Path) -> anyhow::Result<Self> {
        anyhow::ensure!(model_path.is_file(), "model not found: {model_path:?}");
        let model_dir = model_path.parent().unwrap_or_else(|| Path::new("."));

        let tokenizer_path = model_dir.join("tokenizer.json");
        anyhow::ensure!(
            tokenizer_path.exists(),
            "tokenizer.json not found in {model_dir:?}"
        );

        let head = read_head_config(model_dir)?;
        let multi_label = head.problem_type.as_deref() == Some("multi_label_classification");
        let mut labels = labels_from_id2label(&head.id2label)?;
        if labels.is_empty() {
            labels = read_labels_txt(model_dir)?;
        }

        let session = Session::builder()?.commit_from_file(model_path)?;

        let feeds_token_type_ids = session
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");

        // Width of the logits, when the graph declares it.
        let num_labels = infer_num_labels(logits_output(session.outputs())?.dtype());
        match num_labels {
            Some(n) if labels.is_empty() => {
                labels = (0..n).map(|i| format!("LABEL_{i}")).collect();
            }
            Some(n) => {
                anyhow::ensure!(
                    n == labels.len(),
                    "model has {n} outputs but {} labels were configured",
                    labels.len()
                );
            }
            None => {}
        }

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: MAX_SEQ_LEN,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("set truncation: {e}"))?;
        // Single-text inference: no batch padding.
        tokenizer.with_padding(None);

        info!(
            labels = labels.len(),
            multi_label,
            model = %model_path.display(),
            "loaded classification model"
        );
        Ok(Self {
            session,
            tokenizer,
            labels,
            multi_label,
            feeds_token_type_ids,
        })
    }

    /// Label names in output order. Empty if neither the metadata nor the
    /// graph fixed the label count.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn logits(&mut self, text: &str) -> anyhow::Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        let seq_len = encoding.get_ids().len();
        let to_i64 = |xs: &[u32]| xs.iter().map(|&x| x as i64).collect::<Vec<_>>();
        let input_ids = to_i64(encoding.get_ids());
        let attention_mask = to_i64(encoding.get_attention_mask());
        let shape = [1i64, seq_len as i64];

        let ids_tensor = Tensor::from_array((shape, input_ids.into_boxed_slice()))?;
        let mask_tensor = Tensor::from_array((shape, attention_mask.into_boxed_slice()))?;

        let outputs = if self.feeds_token_type_ids {
            let type_ids = to_i64(encoding.get_type_ids());
            let type_tensor = Tensor::from_array((shape, type_ids.into_boxed_slice()))?;
            self.session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
                "token_type_ids" => type_tensor,
            ])?
        } else {
            self.session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
            ])?
        };

        // Logits: [1, num_labels].
        let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        anyhow::ensure!(
            dims.len() == 2 && dims[0] == 1,
            "unexpected output shape: {dims:?}, expected [1, num_labels]"
        );
        Ok(output_data.to_vec())
    }
}

impl Engine for OnnxClassifier {
    fn create_from_resource(context: &AssetContext, name: &str) -> anyhow::Result<Self> {
        let path = context
            .resolve(name)
            .ok_or_else(|| anyhow::anyhow!("invalid model resource name {name:?}"))?;
        Self::load(&path)
    }

    fn classify(&mut self, text: &str) -> anyhow::Result<Vec<Category>> {
        let logits = self.logits(text)?;
        if !self.labels.is_empty() {
            anyhow::ensure!(
                logits.len() == self.labels.len(),
                "model returned {} logits for {} labels",
                logits.len(),
                self.labels.len()
            );
        }

        let scores: Vec<f32> = if self.multi_label {
            logits.iter().map(|&x| sigmoid(x)).collect()
        } else {
            softmax(&logits)
        };

        Ok(scores
            .into_iter()
            .enumerate()
            .map(|(i, score)| match self.labels.get(i) {
                Some(label) => Category::new(label.clone(), score),
                None => Category::new(format!("LABEL_{i}"), score),
            })
            .collect())
    }
}

fn read_head_config(model_dir: &Path) -> anyhow::Result<HeadConfig> {
    let path = model_dir.join("config.json");
    if !path.exists() {
        return Ok(HeadConfig::default());
    }
    let raw = std::fs::read_to_string(&path)?;
    serde_json::from_str(&raw).map_err(|e| anyhow::anyhow!("parse {}: {e}", path.display()))
}

/// Order `id2label` by numeric id. Ids must be exactly `0..n`.
fn labels_from_id2label(id2label: &BTreeMap<String, String>) -> anyhow::Result<Vec<String>> {
    let mut indexed = Vec::with_capacity(id2label.len());
    for (id, label) in id2label {
        let idx: usize = id
            .parse()
            .map_err(|_| anyhow::anyhow!("id2label key {id:?} is not an index"))?;
        indexed.push((idx, label.clone()));
    }
    indexed.sort_by_key(|(idx, _)| *idx);

    for (expected, (idx, _)) in indexed.iter().enumerate() {
        anyhow::ensure!(*idx == expected, "id2label is missing id {expected}");
    }
    Ok(indexed.into_iter().map(|(_, label)| label).collect())
}

fn read_labels_txt(model_dir: &Path) -> anyhow::Result<Vec<String>> {
    let path = model_dir.join("labels.txt");
    if !path.exists() {
        return Ok(vec![]);
    }
    Ok(std::fs::read_to_string(&path)?
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}

/// The logits are read from the first declared output.
fn logits_output<T>(outputs: &[T]) -> anyhow::Result<&T> {
    outputs
        .first()
        .ok_or_else(|| anyhow::anyhow!("model declares no outputs"))
}

/// Try to read the label count from the logits output type.
fn infer_num_labels(output_type: &ort::value::ValueType) -> Option<usize> {
    match output_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
