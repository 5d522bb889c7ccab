use icommon::BoxFuture;

use crate::{ProviderError, ProviderId, ProviderReply, ProviderRequest};

pub type ProviderFuture<'a, T> = BoxFuture<'a, T>;

/// A backend able to answer a conversational request.
///
/// Invocations are opaque external calls: they may be slow, they may fail, and
/// they are never retried by the implementation itself.
pub trait ProviderCapability: Send + Sync {
    fn id(&self) -> ProviderId;

    fn invoke<'a>(
        &'a self,
        request: &'a ProviderRequest,
    ) -> ProviderFuture<'a, Result<ProviderReply, ProviderError>>;
}
