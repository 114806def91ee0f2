// SPDX-License-Identifier: Apache-2.0 OR MIT
// Timing adapter for request handlers

use super::logger::Logger;
use std::time::Instant;

impl Logger {
    /// Run `handler` and log how long it took at LOG.
    ///
    /// The line reads `Method: M\tURI: U\tName: N\tTime: D`. If it cannot be
    /// written the failure is logged at ERR, and if that also fails it is
    /// reported as a `tracing` warning. The handler's result is returned
    /// either way.
    #[track_caller]
    pub fn timed<R>(&self, name: &str, method: &str, uri: &str, handler: impl FnOnce() -> R) -> R {
        let start = Instant::now();
        let result = handler();
        let elapsed = start.elapsed();

        if let Err(err) = self.log_fmt(format_args!(
            "Method: {method}\tURI: {uri}\tName: {name}\tTime: {elapsed:?}"
        )) {
            if let Err(report_err) = self.error(&err) {
                tracing::warn!(
                    error = %err,
                    report_error = %report_err,
                    handler = name,
                    "failed to log timed call"
                );
            }
        }
        result
    }
}
