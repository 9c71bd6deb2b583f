mod shim;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use relay_core::{ContainerId, MessageSink};
use relay_engine::{
    ActionReceiver, CaptureFilters, NotificationListener, Projector, Reconstructor, RelayState,
    ServiceReceiver,
};
use relay_settings::{load_settings, load_settings_from_path};
use relay_telemetry::{init_telemetry, TelemetryConfig};
use tokio::sync::{mpsc, Notify};
use tracing::{error, info, warn};

use crate::shim::{CaptureShim, LoggingDevice, ShimResources, StdoutSink};

#[derive(Parser, Debug)]
#[command(name = "relayd", about = "Relays notifications between containers")]
struct Cli {
    /// Settings file (defaults to RELAY_CONFIG or the system path).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Host socket, overriding settings.
    #[arg(long)]
    socket: Option<String>,

    /// JSON-lines capture input; `-` reads stdin. Capture is off without it.
    #[arg(long)]
    events: Option<PathBuf>,

    /// Relay custom-layout notifications as rendered bitmaps.
    #[arg(long)]
    custom_notifications: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => load_settings_from_path(path),
        None => load_settings(),
    }
    .context("loading settings")?;
    if let Some(socket) = cli.socket {
        settings.socket_path = socket;
    }
    if cli.custom_notifications {
        settings.custom_notifications = true;
    }

    let telemetry = init_telemetry(TelemetryConfig::from(&settings.logging));
    let state = Arc::new(RelayState::new(telemetry.metrics()));

    let stream = relay_transport::connect(Path::new(&settings.socket_path)).await?;
    let (reader, writer) = relay_transport::split(stream, settings.max_frame_bytes);
    let (tx, rx) = mpsc::unbounded_channel();
    let mut writer_task = relay_transport::spawn_writer(writer, rx);
    let outbound: Arc<dyn MessageSink> = Arc::new(tx);

    let actions = Arc::new(ActionReceiver::new(
        Arc::clone(&outbound),
        ContainerId::from_raw(settings.default_container.clone()),
    ));
    actions.boot_completed()?;

    let shutdown = Arc::new(Notify::new());
    let receiver = ServiceReceiver::new(
        Arc::clone(&state),
        Reconstructor::new(Arc::clone(&state), settings.dogear_size),
        Arc::new(StdoutSink),
        Arc::new(LoggingDevice::new(Arc::clone(&shutdown))),
    );
    let mut reader_task = tokio::spawn(async move {
        relay_transport::run_reader(reader, move |cmd| {
            let name = cmd.name();
            if let Err(e) = receiver.handle(cmd) {
                warn!(command = name, kind = e.error_kind(), error = %e, "host command failed");
            }
        })
        .await
    });

    let capture_task = cli.events.map(|path| {
        let resources = Arc::new(ShimResources::default());
        let projector = Projector::new(
            Arc::clone(&state),
            resources.clone(),
            settings.custom_notifications,
        );
        let listener = NotificationListener::new(
            CaptureFilters::from(&settings),
            projector,
            Arc::clone(&outbound),
            Arc::clone(&state),
        );
        let shim = CaptureShim::new(listener, Arc::clone(&actions), resources);
        tokio::spawn(async move {
            if let Err(e) = shim.run(&path).await {
                error!(error = %e, "capture stopped");
            }
        })
    });
    drop(outbound);

    info!(
        socket = %settings.socket_path,
        custom_notifications = settings.custom_notifications,
        capture = capture_task.is_some(),
        "relay running"
    );

    let result = tokio::select! {
        res = &mut reader_task => match res {
            Ok(Ok(delivered)) => {
                info!(delivered, "host closed the connection");
                Ok(())
            }
            Ok(Err(e)) => Err(anyhow::Error::new(e).context("reading from host")),
            Err(e) => Err(anyhow::Error::new(e).context("reader task")),
        },
        res = &mut writer_task => match res {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(anyhow::Error::new(e).context("writing to host")),
            Err(e) => Err(anyhow::Error::new(e).context("writer task")),
        },
        _ = shutdown.notified() => {
            info!("shutdown requested by host");
            Ok(())
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted");
            Ok(())
        }
    };

    if let Some(task) = capture_task {
        task.abort();
    }
    reader_task.abort();
    writer_task.abort();
    info!("relay stopped");
    result
}
