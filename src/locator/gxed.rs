use std::collections::{BTreeMap, BTreeSet};

/// Organization that mirrors third-party repos used by gx packages.
const GXED_ORG: &str = "github.com/gxed";

/// Repositories known to exist under [`GXED_ORG`].
const GXED_REPOS: &[&str] = &[
    "bbloom", "client_golang", "eventfd", "GoEndian", "go-is-domain", "superrepo",
    "golang-levenshtein", "go-homedir", "raft", "go-codec", "go-metrics", "cli",
    "raft-boltdb", "bolt", "mux", "context", "btcd", "ed25519", "s3gof3r", "bazil-fuse",
    "mmap-go", "errors", "smux", "websocket", "badger", "go-lz4", "btcutil", "protobuf",
    "go-farm", "go-immutable-radix", "golang-lru", "sys", "ginkgo", "gomega", "base58",
    "sha256-simd", "blake2b-simd", "opentracing-go", "go.uuid", "go-check", "pubsub",
    "hashland", "zeroconf", "dns", "go-net", "go-text", "go-crypto", "go4-lock",
    "go-isatty", "go-colorable", "structs", "go-toml", "toml", "pb", "go-runewidth",
    "color", "tools", "jsondiff", "ansi", "go-multierror", "go-errwrap", "fsnotify",
    "fuse", "go-crypto-dav", "bulb", "sizedwaitgroup", "go-git", "go-diff", "warnings",
    "gcfg", "ssh-agent", "go-billy", "uuid", "go-nat", "goupnp", "backoff", "go_rng",
    "go-junit-report", "go-require-gx", "opencensus-go", "go-shellwords", "grpc-go",
    "oauth2", "mock", "glog", "go-genproto", "google-cloud-go", "google-api-go-client",
    "go-sync", "pq", "prometheus-common", "client_model", "httprouter", "go-gitignore",
    "aws-sdk-go", "go-jmespath", "envconfig", "go-ceph", "testify", "gods",
    "go-buffruneio", "ssh_config", "go-flags",
];

/// Short names whose gxed mirror is missing the published history.
/// `bbloom` lives at `github.com/ipfs/bbloom` instead.
const EXCLUDED: &[&str] = &["bbloom"];

pub fn default_overrides() -> BTreeMap<String, String> {
    GXED_REPOS
        .iter()
        .map(|name| (name.to_string(), format!("{}/{}", GXED_ORG, name)))
        .collect()
}

pub fn default_exclusions() -> BTreeSet<String> {
    EXCLUDED.iter().map(|s| s.to_string()).collect()
}
