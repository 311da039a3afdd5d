use crate::{
    cluster::{ConfigMapRef, InjectConfigMap, KubeCluster},
    core::{ExemptionSet, InjectionDetector, MeshConfig, Resolver},
    Note, OutputFormat, Report,
};
use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[clap(
    name = "mesh-vet",
    about = "Resolves the namespaces, pods, services, and endpoints in the service mesh"
)]
pub struct Args {
    #[clap(long, default_value = "mesh_vet=info,warn", env = "MESH_VET_LOG")]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(flatten)]
    client: kubert::ClientArgs,

    /// Namespace where the mesh control plane is installed. Never part of the mesh.
    #[clap(long, default_value = MeshConfig::DEFAULT_CONTROL_PLANE_NS)]
    control_plane_namespace: String,

    /// ConfigMap, in the control plane namespace, holding the sidecar injector's configuration
    #[clap(long, default_value = ConfigMapRef::DEFAULT_NAME)]
    inject_config_map: String,

    /// ConfigMap key holding the sidecar injector's configuration document
    #[clap(long, default_value = ConfigMapRef::DEFAULT_KEY)]
    inject_config_key: String,

    /// Pod annotation set by the injector once a pod has been injected
    #[clap(long, default_value = InjectionDetector::ISTIO_STATUS_ANNOTATION)]
    injection_annotation: String,

    #[clap(long, default_value = InjectionDetector::ISTIO_PROXY_CONTAINER)]
    proxy_container_name: String,

    /// Name of the API server's service, which is never part of the mesh
    #[clap(long, default_value = MeshConfig::DEFAULT_INTERNAL_SERVICE_NAME)]
    internal_service_name: String,

    /// Maximum number of objects requested per list call
    #[clap(long, default_value = "500", value_parser = clap::value_parser!(u32).range(1..))]
    page_size: u32,

    /// Vetter name attached to reported notes
    #[clap(long, default_value = "mesh-membership")]
    vetter: String,

    /// Report format (plain or json)
    #[clap(long, short = 'o', default_value = "plain")]
    output: OutputFormat,
}

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            client,
            control_plane_namespace,
            inject_config_map,
            inject_config_key,
            injection_annotation,
            proxy_container_name,
            internal_service_name,
            page_size,
            vetter,
            output,
        } = self;

        log_format
            .try_init(log_level)
            .expect("must configure logging");

        let client = client.try_client().await?;

        let config = MeshConfig {
            exemptions: ExemptionSet::new(control_plane_namespace.clone()),
            injection: InjectionDetector::new(injection_annotation, proxy_container_name),
            internal_service_name,
        };
        debug!(exempted = ?config.exemptions.exempted_names(), "Configured");

        let policy = InjectConfigMap::new(
            client.clone(),
            ConfigMapRef {
                namespace: control_plane_namespace,
                name: inject_config_map,
                key: inject_config_key,
            },
        );
        let resolver = Resolver::new(KubeCluster::new(client, page_size), policy, config);

        let report = match resolver.membership().await {
            Ok(membership) => {
                info!(
                    namespaces = membership.namespaces.len(),
                    pods = membership.pods.len(),
                    services = membership.services.len(),
                    endpoints = membership.endpoints.len(),
                    "Resolved mesh membership"
                );
                let mut report = Report::from(&membership);
                report.notes = Note::unprefixed_service_ports(&vetter, &membership.services);
                report
            }
            Err(error) if error.is_policy_absent() => {
                info!(%error, "Sidecar injection is not configured");
                Report {
                    notes: vec![Note::initializer_disabled(&vetter)],
                    ..Default::default()
                }
            }
            Err(error) => return Err(error.into()),
        };

        report.write(&mut std::io::stdout().lock(), output)
    }
}
