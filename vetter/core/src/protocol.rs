/// Protocols the mesh recognizes from a service port's name.
const PROTOCOLS: [&str; 6] = ["http", "http2", "grpc", "mongo", "redis", "tcp"];

/// Indicates whether a service port's name declares a protocol the mesh supports, either as the
/// whole name (`http`) or as a dash-separated prefix (`http-web`).
pub fn service_port_prefixed(name: &str) -> bool {
    PROTOCOLS.iter().any(|proto| match name.strip_prefix(proto) {
        Some(rest) => rest.is_empty() || rest.starts_with('-'),
        None => false,
    })
}
