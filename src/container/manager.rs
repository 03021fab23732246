use std::path::Path;

use bollard::image::BuildImageOptions;
use bollard::Docker;
use futures::StreamExt;
use tracing::{debug, info};

use crate::errors::PhalanxError;

/// Owns the Docker connection and the scanner image. Each tool run happens
/// in its own ephemeral container created from this image.
pub struct ContainerManager {
    docker: Docker,
    image: String,
}

impl ContainerManager {
    pub fn new(image: &str) -> Result<Self, PhalanxError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| PhalanxError::Container(format!("Failed to connect to Docker: {e}")))?;

        Ok(Self {
            docker,
            image: image.to_string(),
        })
    }

    /// Make sure the scanner image exists locally, building it from the
    /// Dockerfile context when it is missing or a rebuild was requested.
    pub async fn ensure_image(&self, docker_dir: &Path, rebuild: bool) -> Result<(), PhalanxError> {
        if !rebuild && self.docker.inspect_image(&self.image).await.is_ok() {
            debug!(image = %self.image, "Image found locally");
            return Ok(());
        }
        self.build_image(docker_dir).await
    }

    async fn build_image(&self, docker_dir: &Path) -> Result<(), PhalanxError> {
        let dockerfile = docker_dir.join("Dockerfile");
        if !dockerfile.exists() {
            return Err(PhalanxError::Container(format!(
                "Dockerfile not found: {}",
                dockerfile.display()
            )));
        }

        info!(
            image = %self.image,
            context = %docker_dir.display(),
            "Building Docker image (this may take a while)..."
        );

        // Create tar archive of the build context
        let mut archive = tar::Builder::new(Vec::new());
        archive
            .append_dir_all(".", docker_dir)
            .map_err(|e| PhalanxError::Container(format!("Failed to create build context: {e}")))?;
        let context = archive
            .into_inner()
            .map_err(|e| PhalanxError::Container(format!("Failed to finalize build context: {e}")))?;

        let options = BuildImageOptions {
            dockerfile: "Dockerfile",
            t: self.image.as_str(),
            rm: true,
            ..Default::default()
        };

        let mut stream = self.docker.build_image(options, None, Some(context.into()));
        while let Some(result) = stream.next().await {
            match result {
                Ok(output) => {
                    if let Some(line) = output.stream {
                        debug!(build = %line.trim_end(), "docker build");
                    }
                }
                Err(e) => {
                    return Err(PhalanxError::Container(format!("Build failed: {e}")));
                }
            }
        }

        info!(image = %self.image, "Image built successfully");
        Ok(())
    }

    pub fn docker(&self) -> &Docker {
        &self.docker
    }

    pub fn image(&self) -> &str {
        &self.image
    }
}
