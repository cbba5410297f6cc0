//! Command-line dispatch.
//!
//! `myapp /jobs/cleanup` runs the route for `/jobs/cleanup` in CLI context:
//! method-guarded routes never match, `$`-prefixed CLI-only routes may.

use tracing::error;

use crate::request::Request;
use crate::router::Router;

/// Dispatches `args[1]` (`args[0]` is the program name), writes the response
/// body to stdout and returns the process exit code: `0` below 400, `1`
/// otherwise.
///
/// ```rust,no_run
/// # async fn demo(router: eco::Router) {
/// let code = eco::cli::run(&router, std::env::args()).await;
/// std::process::exit(code);
/// # }
/// ```
pub async fn run<I>(router: &Router, args: I) -> i32
where
    I: IntoIterator<Item = String>,
{
    let target = args.into_iter().nth(1).unwrap_or_else(|| {
        error!("failed to detect CLI route, dispatching `/`");
        "/".to_owned()
    });

    let res = router.handle(Request::cli(&target)).await;

    let mut stdout = tokio::io::stdout();
    if let Err(e) = res.write_body(&mut stdout).await {
        error!("stdout write error: {e}");
        return 1;
    }

    if res.status_code().as_u16() < 400 { 0 } else { 1 }
}
