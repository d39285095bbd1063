/// Macro to generate common From implementations for service errors
///
/// Usage:
/// ```ignore
/// impl_service_error_conversions!(SignatureError, Transport);
/// ```
#[macro_export]
macro_rules! impl_service_error_conversions {
  ($error_type:ty, $transport_variant:ident) => {
    impl From<reqwest::Error> for $error_type {
      fn from(err: reqwest::Error) -> Self {
        <$error_type>::$transport_variant(format!("HTTP error: {}", err))
      }
    }
  };

  ($error_type:ty, $transport_variant:ident, $decode_variant:ident) => {
    $crate::impl_service_error_conversions!($error_type, $transport_variant);

    impl From<serde_json::Error> for $error_type {
      fn from(err: serde_json::Error) -> Self {
        <$error_type>::$decode_variant(format!("Invalid response body: {}", err))
      }
    }
  };
}
