//! Static catalog of probed tools.

use serde::{Deserialize, Serialize};

/// Coarse grouping of catalog tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Programming language toolchain
    Language,
    /// Build tool or package manager
    BuildTool,
    /// Container, orchestration or cloud CLI
    DevOps,
    /// Version control system
    VersionControl,
    /// Database client or server
    Database,
    /// Web server or HTTP client
    Web,
    /// Text editor or IDE
    Editor,
    /// Shell or terminal multiplexer
    Shell,
}

/// Longest invocation still matched as a whole word.
const SHORT_INVOCATION: usize = 2;

/// One entry of the tool catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    /// Catalog name, used as the key in every usage and proficiency map.
    pub name: &'static str,
    /// Grouping used to split usage into editors, languages and build tools.
    pub kind: ToolKind,
    /// Command line run to check presence, e.g. `python --version`.
    pub probe: &'static str,
    /// Substring that attributes a history command to this tool.
    pub invocation: &'static str,
    /// Package-manager alias that also attributes a command to this tool.
    pub package_manager: Option<&'static str>,
}

impl ToolSpec {
    /// Program and arguments of the probe command.
    pub fn probe_argv(&self) -> (&'static str, Vec<&'static str>) {
        let mut parts = self.probe.split_whitespace();
        let program = parts.next().unwrap_or(self.name);
        (program, parts.collect())
    }

    /// Whether `command` is attributable to this tool.
    ///
    /// Substring containment on the invocation name or package-manager
    /// alias. Invocations of at most two characters (`R`, `az`, `go`) must
    /// instead appear as a whole whitespace-separated word.
    pub fn matches(&self, command: &str) -> bool {
        let invoked = if self.invocation.len() <= SHORT_INVOCATION {
            command.split_whitespace().any(|word| word == self.invocation)
        } else {
            command.contains(self.invocation)
        };
        invoked
            || self
                .package_manager
                .is_some_and(|manager| command.contains(manager))
    }
}

const fn tool(
    name: &'static str,
    kind: ToolKind,
    probe: &'static str,
    invocation: &'static str,
) -> ToolSpec {
    ToolSpec {
        name,
        kind,
        probe,
        invocation,
        package_manager: None,
    }
}

const fn managed(
    name: &'static str,
    probe: &'static str,
    invocation: &'static str,
    package_manager: &'static str,
) -> ToolSpec {
    ToolSpec {
        name,
        kind: ToolKind::Language,
        probe,
        invocation,
        package_manager: Some(package_manager),
    }
}

use ToolKind::*;

/// Every tool the prober knows about, in probe order.
pub const CATALOG: &[ToolSpec] = &[
    // Programming languages
    managed("python", "python --version", "python", "pip"),
    tool("python3", Language, "python3 --version", "python3"),
    managed("node", "node --version", "node", "npm"),
    managed("go", "go version", "go", "go get"),
    tool("java", Language, "java -version", "java"),
    managed("ruby", "ruby --version", "ruby", "gem"),
    managed("php", "php --version", "php", "composer"),
    managed("rust", "rustc --version", "rustc", "cargo"),
    tool("perl", Language, "perl --version", "perl"),
    tool("scala", Language, "scala -version", "scala"),
    tool("kotlin", Language, "kotlin -version", "kotlin"),
    tool("swift", Language, "swift --version", "swift"),
    tool("r", Language, "R --version", "R"),
    tool("julia", Language, "julia --version", "julia"),
    tool("haskell", Language, "ghc --version", "ghc"),
    tool("elixir", Language, "elixir --version", "elixir"),
    tool("erlang", Language, "erl -version", "erl"),
    tool("clang", Language, "clang --version", "clang"),
    tool("gcc", Language, "gcc --version", "gcc"),
    tool("dotnet", Language, "dotnet --version", "dotnet"),
    tool("lua", Language, "lua -v", "lua"),
    tool("ocaml", Language, "ocaml -version", "ocaml"),
    tool("dart", Language, "dart --version", "dart"),
    tool("zig", Language, "zig version", "zig"),
    tool("nim", Language, "nim --version", "nim"),
    // Build tools and package managers
    tool("maven", BuildTool, "mvn --version", "mvn"),
    tool("gradle", BuildTool, "gradle --version", "gradle"),
    tool("npm", BuildTool, "npm --version", "npm"),
    tool("yarn", BuildTool, "yarn --version", "yarn"),
    tool("pnpm", BuildTool, "pnpm --version", "pnpm"),
    tool("pip", BuildTool, "pip --version", "pip"),
    tool("cargo", BuildTool, "cargo --version", "cargo"),
    tool("composer", BuildTool, "composer --version", "composer"),
    tool("bundler", BuildTool, "bundle --version", "bundle"),
    tool("make", BuildTool, "make --version", "make"),
    // DevOps and cloud
    tool("docker", DevOps, "docker --version", "docker"),
    tool("kubectl", DevOps, "kubectl version --client", "kubectl"),
    tool("terraform", DevOps, "terraform version", "terraform"),
    tool("ansible", DevOps, "ansible --version", "ansible"),
    tool("vagrant", DevOps, "vagrant --version", "vagrant"),
    tool("helm", DevOps, "helm version", "helm"),
    tool("aws", DevOps, "aws --version", "aws"),
    tool("gcloud", DevOps, "gcloud --version", "gcloud"),
    tool("azure", DevOps, "az --version", "az"),
    // Version control
    tool("git", VersionControl, "git --version", "git"),
    tool("svn", VersionControl, "svn --version", "svn"),
    tool("mercurial", VersionControl, "hg --version", "hg"),
    // Databases
    tool("mysql", Database, "mysql --version", "mysql"),
    tool("psql", Database, "psql --version", "psql"),
    tool("mongodb", Database, "mongod --version", "mongo"),
    tool("redis", Database, "redis-cli --version", "redis-cli"),
    // Web servers and HTTP tools
    tool("nginx", Web, "nginx -v", "nginx"),
    tool("apache2", Web, "apache2 -v", "apache2"),
    tool("curl", Web, "curl --version", "curl"),
    tool("wget", Web, "wget --version", "wget"),
    // Editors
    tool("vim", Editor, "vim --version", "vim"),
    tool("nvim", Editor, "nvim --version", "nvim"),
    tool("emacs", Editor, "emacs --version", "emacs"),
    tool("code", Editor, "code --version", "code"),
    // Shells and terminal tools
    tool("zsh", Shell, "zsh --version", "zsh"),
    tool("bash", Shell, "bash --version", "bash"),
    tool("fish", Shell, "fish --version", "fish"),
    tool("tmux", Shell, "tmux -V", "tmux"),
];

/// Look up a catalog entry by name.
pub fn lookup(name: &str) -> Option<&'static ToolSpec> {
    CATALOG.iter().find(|spec| spec.name == name)
}
