use std::process;
use std::sync::Arc;
use std::thread;

use clap::{Parser, Subcommand};
use lifetrace_core::{global, EventKind, ObjectIdentity, Recorder, RecorderConfig, RecorderError, TypeRegistry};
use lifetrace_utils::{info, init_logging};

/// Record who retained and released an object, and from where.
#[derive(Parser, Debug)]
#[command(name = "lifetrace")]
#[command(version)]
#[command(about = "Record who retained and released an object, and from where", long_about = None)]
struct Cli
{
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Simulate a small object graph under the recorder and print its histories
    Demo
    {
        /// Only record objects whose type name starts with this prefix
        #[arg(long)]
        prefix: Option<String>,
        /// Capture a backtrace for every event (overrides LIFETRACE_BACKTRACE)
        #[arg(long, default_value_t = false)]
        backtrace: bool,
        /// Worker threads retaining the shared object concurrently
        #[arg(long, default_value_t = 4)]
        threads: usize,
        /// Retain/release pairs per worker thread
        #[arg(long, default_value_t = 100)]
        retains: usize,
        /// Frames printed per event when backtraces are captured
        #[arg(long, default_value_t = 6)]
        frames: usize,
    },
}

/// Stand-in for an object managed by the host runtime.
struct HostObject
{
    type_name: &'static str,
}

/// Host glue: performs each lifecycle operation and reports it.
struct Host
{
    types: Arc<TypeRegistry>,
}

impl Host
{
    fn allocate(&self, type_name: &'static str) -> Box<HostObject>
    {
        let object = Box::new(HostObject { type_name });
        let identity = ObjectIdentity::of(&*object);
        self.types.register(identity, object.type_name);
        global::notify(identity, EventKind::Allocate);
        object
    }

    fn retain(&self, object: &HostObject, kind: EventKind)
    {
        global::notify(ObjectIdentity::of(object), kind);
    }

    fn release(&self, object: &HostObject)
    {
        global::notify(ObjectIdentity::of(object), EventKind::Release);
    }

    fn deallocate(&self, object: Box<HostObject>)
    {
        let identity = ObjectIdentity::of(&*object);
        global::notify(identity, EventKind::Deallocate);
        self.types.forget(identity);
        drop(object);
    }
}

fn main()
{
    // Initialize logging (reads from RUST_LOG env var)
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let cli = Cli::parse();
    if let Err(e) = run_command(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_command(cli: Cli) -> Result<(), RecorderError>
{
    match cli.command {
        Commands::Demo {
            prefix,
            backtrace,
            threads,
            retains,
            frames,
        } => {
            let mut config = RecorderConfig::from_env()?;
            if backtrace {
                config = config.with_backtrace(true);
            }

            let types = Arc::new(TypeRegistry::new());
            let recorder = global::install(types.clone(), config)?;
            let host = Host { types };

            info!(?prefix, threads, retains, "running demo");
            recorder.begin_session(prefix.as_deref());
            let retained = simulate(&host, threads, retains);

            // Events while stopped are not recorded.
            recorder.end_session();
            host.release(&retained);
            recorder.resume_session();
            host.retain(&retained, EventKind::RetainAutorelease);
            recorder.end_session();

            print_report(recorder, frames);
            Ok(())
        }
    }
}

/// Run a few object lifecycles; returns the object left alive.
fn simulate(host: &Host, threads: usize, retains: usize) -> Box<HostObject>
{
    let controller = host.allocate("MyAppController");
    let view = host.allocate("MyAppView");
    let buffer = host.allocate("ScratchBuffer");

    host.retain(&view, EventKind::StoreStrong);
    host.retain(&buffer, EventKind::Retain);
    host.release(&buffer);
    host.deallocate(buffer);

    thread::scope(|scope| {
        for _ in 0..threads {
            scope.spawn(|| {
                for _ in 0..retains {
                    host.retain(&view, EventKind::Retain);
                    host.release(&view);
                }
            });
        }
    });

    host.retain(&controller, EventKind::RetainBlockCopy);
    host.release(&view);
    host.deallocate(view);
    controller
}

fn print_report(recorder: &Recorder, frames: usize)
{
    let mut identities = recorder.tracked_identities();
    identities.sort();
    println!("{} tracked object(s)", identities.len());

    for identity in identities {
        let history = recorder.history_for(identity);
        println!("\n{identity}: {} event(s), net retain {:+}", history.len(), history.net_retain_delta());

        // Long retain bursts are summarized by their ends.
        let shown: Vec<_> = if history.len() > 12 {
            history.iter().take(6).chain(history.iter().skip(history.len() - 6)).collect()
        } else {
            history.iter().collect()
        };
        for (index, event) in shown.into_iter().enumerate() {
            if index == 6 && history.len() > 12 {
                println!("  ... {} more", history.len() - 12);
            }
            println!("  #{:<6} {}", event.sequence, event.kind);
            for &address in event.backtrace.iter().take(frames) {
                match recorder.symbol_for(address) {
                    Some(symbol) => println!("      {address} {symbol}"),
                    None => println!("      {address} ???"),
                }
            }
        }
    }
}
