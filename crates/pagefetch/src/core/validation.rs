/// Returns `true` if the HTTP status code is in the `3xx` class.
///
/// Every `3xx` response is followed, not only the common 301/302/303/307/308.
///
/// # Examples
///
/// ```
/// use pagefetch::core::is_redirect;
///
/// assert!(is_redirect(301));
/// assert!(is_redirect(399));
/// assert!(!is_redirect(200));
/// assert!(!is_redirect(404));
/// ```
pub fn is_redirect(status: u16) -> bool { (300..400).contains(&status) }
