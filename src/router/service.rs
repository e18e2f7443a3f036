use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower_service::Service;

use crate::{
    error::BoxError,
    protocol::{
        constants::METHOD_NOT_FOUND,
        error::ErrorData,
        message::{JsonRpcRequest, JsonRpcResponse},
    },
    router::{ext::RouterExt, traits::Router},
};

/// Adapts a [`Router`] into a `tower_service::Service` over JSON-RPC
/// requests, dispatching on the MCP method names.
pub struct RouterService<T>(pub T);

impl<T> Service<JsonRpcRequest> for RouterService<T>
where
    T: Router + Clone + Send + Sync + 'static,
{
    type Response = JsonRpcResponse;
    type Error = BoxError;
    type Future =
        Pin<Box<dyn Future<Output = core::result::Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<core::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: JsonRpcRequest) -> Self::Future {
        let this = self.0.clone();

        Box::pin(async move {
            let result = match req.method.as_str() {
                "initialize" => this.handle_initialize(req).await,
                "ping" => this.handle_ping(req).await,
                "tools/list" => this.handle_tools_list(req).await,
                "tools/call" => this.handle_tools_call(req).await,
                _ => {
                    let mut response = this.create_response(req.id);
                    response.error = Some(ErrorData::new(
                        METHOD_NOT_FOUND,
                        format!("Method '{}' not found", req.method),
                    ));
                    Ok(response)
                }
            };

            result.map_err(BoxError::from)
        })
    }
}
