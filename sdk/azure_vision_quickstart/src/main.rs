mod demo;
mod format;

use std::path::Path;
use std::process::ExitCode;

use azure_vision_analysis::read::{PollOptions, TextRecognitionMode};
use azure_vision_core::client::VisionClient;
use azure_vision_core::error::{VisionError, VisionResult};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::demo::DemoImage;

const RESOURCES_DIR: &str = "resources";

const LANDMARK_URL: &str = "https://raw.githubusercontent.com/Azure-Samples/cognitive-services-sample-data-files/master/ComputerVision/Images/landmark.jpg";
const BRANDS_URL: &str =
    "https://docs.microsoft.com/en-us/azure/cognitive-services/computer-vision/images/gray-shirt-logo.jpg";
const PRINTED_TEXT_URL: &str = "https://raw.githubusercontent.com/Azure-Samples/cognitive-services-sample-data-files/master/ComputerVision/Images/printed_text.jpg";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

/// Cancels `token` on the first Ctrl-C.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Ctrl-C received, cancelling");
                token.cancel();
            }
            Err(err) => tracing::warn!(error = %err, "could not listen for Ctrl-C"),
        }
    });
}

async fn local(name: &str) -> VisionResult<DemoImage> {
    DemoImage::local(Path::new(RESOURCES_DIR).join(name)).await
}

async fn run(client: &VisionClient, cancel: &CancellationToken) -> VisionResult<()> {
    let faces = local("faces.jpg").await?;
    let landmark = DemoImage::remote(LANDMARK_URL);

    println!("\n\nLocal image path:\n{}", faces.location());
    println!("\n\nRemote image URL:\n{}", landmark.location());

    let pair = [&faces, &landmark];

    for image in pair {
        print(demo::describe_image(client, image).await?);
    }
    for image in pair {
        print(demo::categorize_image(client, image).await?);
    }
    for image in pair {
        print(demo::tag_image(client, image).await?);
    }
    for image in pair {
        print(demo::detect_faces(client, image).await?);
    }
    for image in pair {
        print(demo::detect_adult_content(client, image).await?);
    }
    for image in pair {
        print(demo::detect_color_scheme(client, image).await?);
    }
    for image in pair {
        print(demo::detect_domain_content(client, image).await?);
    }
    for image in pair {
        print(demo::detect_image_type(client, image).await?);
    }
    for image in pair {
        print(demo::detect_objects(client, image).await?);
    }

    let logo = local("gray-shirt-logo.jpg").await?;
    let brands = DemoImage::remote(BRANDS_URL);
    for image in [&logo, &brands] {
        print(demo::detect_brands(client, image).await?);
    }

    let handwritten = local("handwritten_text.jpg").await?;
    let printed_remote = DemoImage::remote(PRINTED_TEXT_URL);
    let options = PollOptions::default();
    for (image, mode) in [
        (&handwritten, TextRecognitionMode::Handwritten),
        (&printed_remote, TextRecognitionMode::Printed),
    ] {
        print(demo::read_text(client, image, mode, &options, cancel).await?);
    }

    let printed_local = local("printed_text.jpg").await?;
    for image in [&printed_local, &printed_remote] {
        print(demo::recognize_printed_text(client, image).await?);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let config = match demo::config_from_env() {
        Ok(config) => config,
        Err(instructions) => {
            println!("{instructions}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(region = config.region(), "configuration loaded");

    let client = match VisionClient::from_config(&config) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let outcome = tokio::select! {
        biased;
        () = cancel.cancelled() => Err(VisionError::Cancelled { operation_id: None }),
        result = run(&client, &cancel) => result,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
