/// Decides whether a websocket upgrade from `origin` is accepted.
pub trait OriginPolicy: Send + Sync + 'static {
    fn is_allowed(&self, origin: Option<&str>) -> bool;
}

/// Accepts every origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllOrigins;

impl OriginPolicy for AcceptAllOrigins {
    fn is_allowed(&self, _origin: Option<&str>) -> bool {
        true
    }
}
