//! Custom request headers carried by operation options.

/// Implement `with_header`/`with_headers` for option structs holding a
/// `headers: HashMap<String, String>` field.
///
/// ```
/// use std::collections::HashMap;
///
/// #[derive(Debug, Default)]
/// pub struct PingOptions {
///     pub headers: HashMap<String, String>,
/// }
///
/// cis_core::impl_custom_headers!(PingOptions);
///
/// let options = PingOptions::default().with_header("x-trace", "1");
/// assert_eq!(options.headers["x-trace"], "1");
/// ```
#[macro_export]
macro_rules! impl_custom_headers {
    ($($options:ty),+ $(,)?) => {
        $(
            impl $options {
                /// Add a header sent with this request.
                #[must_use]
                pub fn with_header(
                    mut self,
                    name: impl Into<String>,
                    value: impl Into<String>,
                ) -> Self {
                    self.headers.insert(name.into(), value.into());
                    self
                }

                /// Add headers sent with this request.
                #[must_use]
                pub fn with_headers(
                    mut self,
                    headers: impl IntoIterator<Item = (String, String)>,
                ) -> Self {
                    self.headers.extend(headers);
                    self
                }
            }
        )+
    };
}
