use std::cell::Cell;
use std::rc::{Rc, Weak};

use clap::Parser;
use deferred::{Deferred, DeferredFn};

#[derive(Parser, Debug)]
#[command(about = "Guards whose callable triggers the guard holding it")]
struct Args {
    /// Log every guard transition
    #[arg(short, long)]
    verbose: bool,
}

type Guard = Deferred<Box<dyn FnOnce()>>;

thread_local! {
    static FN_BREAKER: DeferredFn = const { DeferredFn::empty() };
    static FN_RUNS: Cell<u32> = const { Cell::new(0) };
}

fn fn_breaker() {
    FN_RUNS.with(|runs| runs.set(runs.get() + 1));
    tracing::info!("fn breaker running, triggering own guard");
    FN_BREAKER.with(|guard| guard.invoke());
}

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::TRACE
        } else {
            tracing::Level::INFO
        })
        .init();

    let runs = Rc::new(Cell::new(0_u32));
    let breaker: Rc<Guard> = Rc::new(Guard::empty());
    let (me, counter) = (Rc::downgrade(&breaker), runs.clone());
    breaker.assign(&Guard::new(Box::new(move || {
        counter.set(counter.get() + 1);
        tracing::info!("breaker running, triggering own guard");
        if let Some(guard) = Weak::upgrade(&me) {
            guard.invoke();
        }
    })));
    breaker.invoke();
    tracing::info!(runs = runs.get(), armed = breaker.is_armed(), "generic breaker done");

    FN_BREAKER.with(|guard| {
        guard.assign(&DeferredFn::new(fn_breaker));
        guard.invoke();
        tracing::info!(runs = FN_RUNS.with(Cell::get), armed = guard.is_armed(), "fn breaker done");
    });
}
