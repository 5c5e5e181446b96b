use axum::extract::Request;
use http::{Uri, uri::PathAndQuery};

const NETLIFY_PREFIX: &str = "/.netlify/functions";

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Recovers the canonical `/api/...` path-and-query from the ways a
/// serverless catch-all can deliver it. Returns `None` when nothing needs
/// to change.
///
/// * `/api?path=series&path=42` and `/api?path=series/42` become `/api/series/42`
/// * `/.netlify/functions/<fn>/series/42` becomes `/api/series/42`
/// * empty segments are dropped
pub fn normalize(path: &str, query: Option<&str>) -> Option<String> {
    let mut parts: Vec<String> = match path.strip_prefix(NETLIFY_PREFIX) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => std::iter::once("api")
            .chain(segments(rest).skip(1))
            .map(str::to_string)
            .collect(),
        _ => segments(path).map(str::to_string).collect(),
    };

    if parts.first().map(String::as_str) != Some("api") {
        return None;
    }

    let mut query = query.filter(|q| !q.is_empty()).map(str::to_string);
    if parts.len() == 1 {
        if let Some(raw) = query.take() {
            let (path_params, others): (Vec<_>, Vec<_>) =
                url::form_urlencoded::parse(raw.as_bytes())
                    .into_owned()
                    .partition(|(key, _)| key == "path");

            if path_params.is_empty() {
                query = Some(raw);
            } else {
                for (_, value) in &path_params {
                    parts.extend(segments(value).map(str::to_string));
                }
                if !others.is_empty() {
                    query = Some(
                        url::form_urlencoded::Serializer::new(String::new())
                            .extend_pairs(others)
                            .finish(),
                    );
                }
            }
        }
    }

    let mut normalized = format!("/{}", parts.join("/"));
    if let Some(query) = &query {
        normalized.push('?');
        normalized.push_str(query);
    }

    let unchanged = match &query {
        Some(q) => normalized == format!("{path}?{q}"),
        None => normalized == path,
    };
    if unchanged {
        return None;
    }

    Some(normalized)
}

/// Request mapper placed in front of the router.
pub fn rewrite_request(mut req: Request) -> Request {
    let uri = req.uri();
    let Some(normalized) = normalize(uri.path(), uri.query()) else {
        return req;
    };

    let mut parts = uri.clone().into_parts();
    match normalized.parse::<PathAndQuery>() {
        Ok(path_and_query) => parts.path_and_query = Some(path_and_query),
        Err(e) => {
            debug!("cannot rewrite {} to {normalized}: {e}", req.uri());
            return req;
        }
    }

    match Uri::from_parts(parts) {
        Ok(rewritten) => {
            trace!("rewrite {} to {rewritten}", req.uri());
            *req.uri_mut() = rewritten;
        }
        Err(e) => debug!("cannot rewrite {}: {e}", req.uri()),
    }

    req
}
