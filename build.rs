fn main() {
    git_revision::set();
}

mod git_revision {
    use std::env;
    use std::process::Command;

    const GIT_REVISION: &str = "GIT_REVISION";

    pub fn set() {
        println!("cargo:rerun-if-env-changed={GIT_REVISION}");

        if let Ok(revision) = env::var(GIT_REVISION) {
            println!("cargo:rustc-env={GIT_REVISION}={revision}");
            return;
        }

        let revision = match Command::new("git")
            .args(["status", "--porcelain"])
            .output()
        {
            Ok(status) if status.status.success() && !status.stdout.is_empty() => {
                "dirty".to_string()
            },
            Ok(status) if status.status.success() => Command::new("git")
                .args(["rev-parse", "HEAD"])
                .output()
                .ok()
                .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
                .filter(|rev| !rev.is_empty())
                .unwrap_or_else(|| "unknown".to_string()),
            // Not a checkout (e.g. a source tarball)
            _ => "unknown".to_string(),
        };

        println!("cargo:rustc-env={GIT_REVISION}={revision}");
    }
}
