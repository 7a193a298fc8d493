//! Query-string construction shared by all upstream calls.

use reqwest::Url;

use crate::error::{Result, UpstreamError};

/// Merge `params` into the query string of `url`.
///
/// A parameter that already exists is replaced in place, new ones are
/// appended in the order given, and unrelated existing parameters are left
/// alone. With no params the URL is returned untouched.
pub fn merge_query<K, V>(url: &str, params: &[(K, V)]) -> Result<String>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut parsed = Url::parse(url).map_err(|e| UpstreamError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if params.is_empty() {
        return Ok(url.to_string());
    }

    let mut pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
    for (key, value) in params {
        let (key, value) = (key.as_ref(), value.as_ref());
        match pairs.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value.to_string(),
            None => pairs.push((key.to_string(), value.to_string())),
        }
    }

    parsed.query_pairs_mut().clear().extend_pairs(&pairs);
    Ok(parsed.to_string())
}

/// `id=<single>` for one id, `ids=<a,b,c>` otherwise
pub fn id_query<T: ToString>(ids: &[T]) -> (&'static str, String) {
    match ids {
        [single] => ("id", single.to_string()),
        _ => (
            "ids",
            ids.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
        ),
    }
}

/// URL for one batched lookup against `base`
pub fn batch_url<T: ToString>(base: &str, ids: &[T]) -> Result<String> {
    merge_query(base, &[id_query(ids)])
}
