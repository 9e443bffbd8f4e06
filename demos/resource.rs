#[macro_use]
extern crate tracing;

use std::cell::Cell;
use std::mem::size_of_val;

use anyhow::{bail, Result};
use clap::Parser;
use deferred::{defer, DeferredFn};

#[derive(Parser, Debug)]
#[command(about = "Releases resources with deferred guards while errors unwind")]
struct Args {
    /// Log every guard transition
    #[arg(short, long)]
    verbose: bool,

    /// Let the work succeed instead of failing halfway
    #[arg(long)]
    succeed: bool,
}

/// Pretend synchronized resource: it can only be touched while locked, and the
/// lock is reachable through methods only.
#[derive(Default)]
struct Resource {
    locked: Cell<bool>,
    mutations: Cell<u32>,
}

impl Resource {
    fn lock(&self) {
        assert!(!self.locked.replace(true), "already locked");
        debug!("resource locked");
    }
    fn unlock(&self) {
        self.locked.set(false);
        debug!("resource unlocked");
    }
    fn mutate(&self) -> Result<()> {
        anyhow::ensure!(self.locked.get(), "resource must be locked before mutating");
        self.mutations.set(self.mutations.get() + 1);
        Ok(())
    }
}

fn mutate_locked(resource: &Resource, succeed: bool) -> Result<()> {
    resource.lock();
    let unlock = defer(|| {
        resource.unlock();
        info!("resource unlocked by guard");
    });
    info!("guard size: {} bytes", size_of_val(&unlock));

    resource.mutate()?;
    if !succeed {
        bail!("something bad happened while the resource was locked");
    }
    resource.mutate()?;
    Ok(())
}

fn fill_scratch(succeed: bool) -> Result<f64> {
    let scratch = vec![0.5_f64; 16];
    let len = scratch.len();
    let free = defer(move || {
        drop(scratch);
        info!(len, "scratch buffer freed by guard");
    });
    info!("guard size: {} bytes", size_of_val(&free));

    if !succeed {
        bail!("could not compute from scratch buffer");
    }
    Ok(0.5 * len as f64)
}

fn goodbye() {
    info!("plain function guard fired");
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::TRACE
        } else {
            tracing::Level::INFO
        })
        .init();

    let farewell = DeferredFn::new(goodbye);
    info!("function pointer guard size: {} bytes", size_of_val(&farewell));

    let resource = Resource::default();
    if let Err(e) = mutate_locked(&resource, args.succeed) {
        error!("ERROR: {e:#}");
    }
    anyhow::ensure!(!resource.locked.get(), "resource left locked");
    info!(mutations = resource.mutations.get(), "resource released");

    match fill_scratch(args.succeed) {
        Ok(total) => info!(total, "scratch computed"),
        Err(e) => error!("ERROR: {e:#}"),
    }

    // a guard whose callable fails does not take the program down
    defer(|| panic!("cleanup that fails")).invoke();
    info!("still running after a failing cleanup");
    Ok(())
}
