use reclaim_resource::{HandleWatch, ManagedResource, ReleaseMode, ResourceOptions};
use reclaim_utils::cleanup::Cleaner;
use reclaim_utils::tracing::resource_span;
use std::path::Path;
use std::time::{Duration, Instant};

pub fn execute(
    cleaner: &Cleaner,
    path: &Path,
    message: &str,
    release_mode: Option<ReleaseMode>,
    abandon: bool,
    wait: Duration,
) -> eyre::Result<()> {
    let mut options = ResourceOptions::from_env()?;
    if let Some(mode) = release_mode {
        options.release_mode = mode;
    }

    let span = resource_span("managed", path);
    let _enter = span.enter();

    let resource = ManagedResource::create_with(cleaner, path, options)?;
    resource.write(message)?;
    println!(
        "Wrote {} bytes to {}",
        resource.bytes_written(),
        path.display()
    );

    let watch = resource.watch();
    if abandon {
        drop(resource);
        // Nudge the cleaner; like a GC hint, this guarantees nothing.
        cleaner.request_sweep();

        let closed = wait_for_close(&watch, wait);
        println!(
            "Abandoned with release mode {}: handle {}",
            options.release_mode,
            if closed { "closed" } else { "still open" }
        );
    } else {
        resource.release()?;
        resource.release()?;
        println!("Released explicitly: handle closed");
    }

    Ok(())
}

fn wait_for_close(watch: &HandleWatch, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while !watch.is_closed() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    watch.is_closed()
}
