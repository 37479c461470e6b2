//! Attribute and type naming
//!
//! Kubernetes fields are camelCase; provider attributes are snake_case.

/// Convert a Kubernetes field name to a snake_case attribute name
///
/// Acronym runs stay together (`podCIDR` -> `pod_cidr`, `OAuth` -> `o_auth`),
/// non-alphanumeric characters become single underscores and a leading digit
/// gets a `_` prefix.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if c.is_ascii_uppercase() && !out.is_empty() && !out.ends_with('_') {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }

        out.push(c.to_ascii_lowercase());
    }

    while out.ends_with('_') {
        out.pop();
    }

    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }

    out
}

/// Provider type name for a CRD version
///
/// `k8s` + `autoscaling.k8s.io` + `VerticalPodAutoscaler` + `v1` gives
/// `k8s_autoscaling_k8s_io_vertical_pod_autoscaler_v1`.
pub fn type_name(provider: &str, group: &str, kind: &str, version: &str) -> String {
    let group = group
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect::<String>();

    let mut parts = vec![provider.to_string()];
    if !group.is_empty() {
        parts.push(group);
    }
    parts.push(snake_case(kind));
    parts.push(snake_case(version));
    parts.join("_")
}
