use std::io;
use std::path::Path;

use tokenizers::{Tokenizer, TruncationParams};

/// Resolves `tokenizer.json` from a model directory, or accepts the file itself.
pub fn tokenizer_path(model_path: &Path) -> io::Result<std::path::PathBuf> {
    if model_path
        .file_name()
        .is_some_and(|name| name == std::ffi::OsStr::new("tokenizer.json"))
    {
        return Ok(model_path.to_path_buf());
    }
    if model_path.is_dir() {
        return Ok(model_path.join("tokenizer.json"));
    }
    model_path
        .parent()
        .map(|p| p.join("tokenizer.json"))
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "model path has no parent"))
}

/// Loads a tokenizer that truncates (query, passage) pairs to `max_len` tokens.
///
/// Cross-encoders have a hard position limit; long passages are cut, never rejected.
pub fn load_pair_tokenizer(model_path: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let mut tokenizer = Tokenizer::from_file(tokenizer_path(model_path)?).map_err(io::Error::other)?;
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_len,
            ..Default::default()
        }))
        .map_err(|e| io::Error::other(format!("failed to configure truncation: {e}")))?;
    Ok(tokenizer)
}
