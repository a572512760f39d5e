use reclaim_resource::{ResourceOptions, UnmanagedResource};
use reclaim_utils::tracing::resource_span;
use std::path::Path;

pub fn execute(path: &Path, message: &str, leak: bool) -> eyre::Result<()> {
    let options = ResourceOptions::from_env()?;

    let span = resource_span("unmanaged", path);
    let _enter = span.enter();

    let resource = UnmanagedResource::create_with(path, options)?;
    resource.write(message)?;
    println!(
        "Wrote {} bytes to {}",
        resource.bytes_written(),
        path.display()
    );

    if leak {
        let watch = resource.watch();
        drop(resource);
        println!(
            "Dropped without close: handle {}",
            if watch.is_closed() { "closed" } else { "still open" }
        );
    } else {
        resource.close()?;
        println!("Closed explicitly: handle closed");
    }

    Ok(())
}
