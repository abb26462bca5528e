//! Push-based signal consumer.

use crate::error::GridError;

/// Push-based consumer of an [`crate::Observable`].
///
/// A subscription delivers either `on_next` at most once followed by
/// `on_completed`, or a lone `on_error`. Signals arrive on the thread that
/// completed the underlying invocation unless the observable was scheduled
/// with [`crate::Observable::observe_on`].
///
/// Unsubscribing never produces a signal. A cancellation started by the
/// client itself is an underlying failure and arrives through `on_error`
/// with [`crate::ErrorCode::Cancelled`].
pub trait Observer<T>: Send + 'static {
    fn on_next(&mut self, value: T);

    fn on_error(&mut self, error: GridError);

    fn on_completed(&mut self);
}

pub(crate) type BoxedObserver<T> = Box<dyn Observer<T>>;

/// Outcome of one invocation after projection: the optional value to emit, or
/// the failure.
pub(crate) type Terminal<T> = Result<Option<T>, GridError>;

pub(crate) fn emit<T: Send + 'static>(observer: &mut dyn Observer<T>, terminal: Terminal<T>) {
    match terminal {
        Ok(value) => {
            if let Some(value) = value {
                observer.on_next(value);
            }
            observer.on_completed();
        }
        Err(error) => observer.on_error(error),
    }
}

#[cfg(test)]
mod tests {
    use super::{emit, Observer};
    use crate::error::GridError;

    #[derive(Default)]
    struct Log(Vec<String>);

    impl Observer<&'static str> for Log {
        fn on_next(&mut self, value: &'static str) {
            self.0.push(format!("next:{value}"));
        }

        fn on_error(&mut self, error: GridError) {
            self.0.push(format!("error:{}", error.code()));
        }

        fn on_completed(&mut self) {
            self.0.push("completed".to_string());
        }
    }

    #[test]
    fn terminal_outcomes_map_to_signal_sequences() {
        let mut log = Log::default();
        emit(&mut log, Ok(Some("v")));
        emit(&mut log, Ok(None));
        emit(&mut log, Err(GridError::invalid_argument("bad")));

        assert_eq!(
            log.0,
            vec!["next:v", "completed", "completed", "error:invalid_argument"]
        );
    }
}
