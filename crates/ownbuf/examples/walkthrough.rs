//! Walkthrough of the buffer lifecycle.
//!
//! Run with `RUST_LOG=ownbuf=trace cargo run --example walkthrough` to see
//! each acquisition and release as it happens.

use ownbuf::{BufferError, OwnedBuffer};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), BufferError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    {
        // Acquired here, released at the closing brace.
        let _r = OwnedBuffer::new("Hello")?;
    }

    {
        let r = OwnedBuffer::new("Hello")?;
        if r.is_valid() {
            assert_eq!(r.get(), b"Hello");
        }
    }

    {
        let mut r = OwnedBuffer::new("Hello")?;
        // Released early; the drop at scope exit is then a no-op.
        r.clear();
        assert!(!r.is_valid());
    }

    {
        let r = OwnedBuffer::new("Hello")?;
        let r2 = r.try_clone()?;
        assert_eq!(r.get(), r2.get());
    }

    {
        let r = OwnedBuffer::new("Hello")?;
        let r2 = OwnedBuffer::new("")?;
        // `let r2 = r;` would move `r`, not copy it; `r` is then unusable.
        assert_ne!(r, r2);
    }

    tracing::info!("walkthrough complete");
    Ok(())
}
