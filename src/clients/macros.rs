/// Generate client methods with oneshot channel boilerplate and automatic tracing.
///
/// The error type must have a `ServiceUnavailable(String)` variant, used when
/// the service task is gone.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, Error = $error_type:ty) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $error_type> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| <$error_type>::ServiceUnavailable("service closed".to_string()))?;

                response.await.map_err(|_| <$error_type>::ServiceUnavailable("service dropped the request".to_string()))?
            }
        }
    };
}
