//! Helm operations: install, dependency resolution, packaging, indexing

use std::path::Path;

use crate::error::{PublishError, Result};
use crate::process::{Cmd, CommandRunner};

const INSTALL_SCRIPT_URL: &str =
    "https://raw.githubusercontent.com/helm/helm/master/scripts/get-helm-3";
const INSTALL_SCRIPT: &str = "get_helm.sh";

/// Fetch and run the official Helm 3 install script, then verify the
/// binary answers `helm version`. Any step failing aborts the pipeline.
pub fn install_helm3(runner: &dyn CommandRunner, workdir: &Path) -> Result<()> {
    let steps: [(&str, Cmd); 4] = [
        (
            "download",
            Cmd::new("curl")
                .args(["-fsSL", "-o", INSTALL_SCRIPT, INSTALL_SCRIPT_URL])
                .cwd(workdir),
        ),
        (
            "chmod",
            Cmd::new("chmod").args(["700", INSTALL_SCRIPT]).cwd(workdir),
        ),
        (
            "install",
            Cmd::new(format!("./{INSTALL_SCRIPT}")).cwd(workdir),
        ),
        ("verify", Cmd::new("helm").arg("version").cwd(workdir)),
    ];

    for (step, cmd) in steps {
        runner.run(&cmd).map_err(|e| PublishError::ToolInstall {
            step: step.to_string(),
            message: e.to_string(),
        })?;
    }

    tracing::info!("installed helm 3");
    Ok(())
}

/// Resolve a chart's declared dependencies against its lock metadata.
pub fn dependency_update(runner: &dyn CommandRunner, chart_dir: &Path, chart: &str) -> Result<()> {
    tracing::info!(chart, "resolving chart dependencies");

    runner
        .run(&Cmd::new("helm").args(["dependency", "update"]).cwd(chart_dir))
        .map_err(|e| PublishError::packaging(chart, e.to_string()))?;

    Ok(())
}

/// Package one chart directory into `destination`, forwarding any
/// user-supplied extra arguments after the built-in ones.
pub fn package_chart(
    runner: &dyn CommandRunner,
    charts_dir: &Path,
    chart: &str,
    destination: &Path,
    extra_args: &[String],
) -> Result<()> {
    tracing::info!(chart, "packaging chart");

    let cmd = Cmd::new("helm")
        .arg("package")
        .arg(chart)
        .arg("--destination")
        .arg(destination.to_string_lossy())
        .args(extra_args.iter().cloned())
        .cwd(charts_dir);

    runner
        .run(&cmd)
        .map_err(|e| PublishError::packaging(chart, e.to_string()))?;

    Ok(())
}

/// Regenerate `index.yaml` over every archive in the destination tree.
pub fn repo_index(runner: &dyn CommandRunner, repo_dir: &Path) -> Result<()> {
    tracing::info!(dir = %repo_dir.display(), "regenerating chart index");

    runner
        .run(
            &Cmd::new("helm")
                .args(["repo", "index"])
                .arg(repo_dir.to_string_lossy()),
        )
        .map_err(|e| PublishError::Index {
            message: e.to_string(),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::testing::RecordingRunner;

    #[test]
    fn install_runs_download_chmod_script_verify() {
        let runner = RecordingRunner::new();
        let tmp = tempfile::tempdir().unwrap();

        install_helm3(&runner, tmp.path()).unwrap();

        let programs: Vec<String> = runner
            .calls
            .borrow()
            .iter()
            .map(|c| c.program().to_string())
            .collect();
        assert_eq!(programs, ["curl", "chmod", "./get_helm.sh", "helm"]);
    }

    #[test]
    fn install_failure_names_the_step() {
        let runner = RecordingRunner::new().fail_when(|cmd| cmd.program() == "curl");
        let tmp = tempfile::tempdir().unwrap();

        let err = install_helm3(&runner, tmp.path()).unwrap_err();
        assert!(err.to_string().contains("download"));
        // short-circuits before chmod
        assert_eq!(runner.call_count(), 1);
    }

    #[test]
    fn package_forwards_extra_args_after_destination() {
        let runner = RecordingRunner::new();
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("out");
        let dest_str = dest.to_string_lossy().into_owned();
        let extra = vec!["--app-version".to_string(), "1.0".to_string(), "--debug".to_string()];

        package_chart(&runner, tmp.path(), "foo", &dest, &extra).unwrap();

        let calls = runner.calls_matching("helm", &["package"]);
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].arg_list(),
            [
                "package",
                "foo",
                "--destination",
                dest_str.as_str(),
                "--app-version",
                "1.0",
                "--debug"
            ]
        );
    }

    #[test]
    fn dependency_update_runs_in_the_chart_directory() {
        let runner = RecordingRunner::new();
        let tmp = tempfile::tempdir().unwrap();
        let chart_dir = tmp.path().join("foo");

        dependency_update(&runner, &chart_dir, "foo").unwrap();

        let calls = runner.calls_matching("helm", &["dependency", "update"]);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].working_dir(), Some(chart_dir.as_path()));
    }
}
