//! Text extraction from uploaded bytes

use crate::error::{Result, ScreenerError};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, PoisonError};

// The panic hook is process-wide; swaps must not interleave.
static PANIC_HOOK_LOCK: Mutex<()> = Mutex::new(());

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// Concatenates the text of every page in page order
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        // pdf-extract panics on some malformed documents instead of returning an error
        match catch_panic_quietly(|| pdf_extract::extract_text_from_mem(bytes)) {
            Ok(result) => result
                .map_err(|e| ScreenerError::PdfExtraction(format!("Failed to extract text from PDF: {}", e))),
            Err(message) => Err(ScreenerError::PdfExtraction(format!(
                "Failed to extract text from PDF: malformed document ({})",
                message
            ))),
        }
    }
}

/// Run `f`, turning a panic into its message without the default hook
/// printing a backtrace to stderr.
fn catch_panic_quietly<T>(f: impl FnOnce() -> T) -> std::result::Result<T, String> {
    let _guard = PANIC_HOOK_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    panic::set_hook(previous);
    result.map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| ScreenerError::Decode(format!("File is not valid UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_decoded() {
        let text = PlainTextExtractor.extract("Senior Engineer\nRust, SQL".as_bytes()).unwrap();
        assert_eq!(text, "Senior Engineer\nRust, SQL");
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let result = PlainTextExtractor.extract(&[0x66, 0x6f, 0xff, 0xfe]);
        assert!(matches!(result, Err(ScreenerError::Decode(_))));
    }

    #[test]
    fn test_garbage_pdf_is_rejected() {
        let result = PdfExtractor.extract(b"definitely not a pdf");
        assert!(matches!(result, Err(ScreenerError::PdfExtraction(_))));
    }

    #[test]
    fn test_panic_is_caught_with_message() {
        let result: std::result::Result<(), String> = catch_panic_quietly(|| panic!("bad xref at {}", 42));
        assert_eq!(result.unwrap_err(), "bad xref at 42");

        assert_eq!(catch_panic_quietly(|| 7), Ok(7));
    }

    #[test]
    fn test_panic_hook_is_restored() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        const THREAD: &str = "hook-check";
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let previous = {
            let _guard = PANIC_HOOK_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
            let previous = panic::take_hook();
            panic::set_hook(Box::new(move |_| {
                if std::thread::current().name() == Some(THREAD) {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            }));
            previous
        };

        let handle = std::thread::Builder::new()
            .name(THREAD.to_string())
            .spawn(move || {
                let silenced = catch_panic_quietly(|| panic!("silenced")).is_err();
                let after = panic::catch_unwind(|| panic!("after")).is_err();
                silenced && after
            })
            .unwrap();
        let unwound = handle.join().unwrap();
        {
            let _guard = PANIC_HOOK_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
            panic::set_hook(previous);
        }

        assert!(unwound);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
