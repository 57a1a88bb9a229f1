use crate::config::{GeneratorConfig, ResourceKind};

const SHELL_META: &[char] = &[
    ' ', '\t', '\n', '\'', '"', '\\', '$', '`', '!', '*', '?', '[', ']', '(', ')', '{', '}', '<', '>', '|', '&', ';',
    '#', '~',
];

/// Always single-quotes; an embedded `'` becomes `'\''`. Values with line
/// breaks use `$'..'` quoting so the hint stays on one comment line.
pub fn quote_value(value: &str) -> String {
    if value.contains(['\n', '\r']) {
        let escaped = value
            .replace('\\', "\\\\")
            .replace('\'', "\\'")
            .replace('\n', "\\n")
            .replace('\r', "\\r");
        return format!("$'{}'", escaped);
    }
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Quotes only when the argument would otherwise be split or expanded.
pub fn quote_arg(arg: &str) -> String {
    if arg.is_empty() || arg.contains(SHELL_META) {
        quote_value(arg)
    } else {
        arg.to_string()
    }
}

/// Example `nctl update app` invocations, as shell comments, for setting the
/// generated values directly on an app instead of through `.deploio.yaml`.
pub fn render_hints(config: &GeneratorConfig, app: &str, database_url: &str, redis_url: &str) -> String {
    let project = quote_arg(&config.project);
    let app = quote_arg(app);
    let mysql_kind = ResourceKind::from(config.mysql_kind);
    let s3 = &config.s3;

    let lines = [
        String::new(),
        "# Example: set directly (runtime env); load the PEMs into variables first:".to_string(),
        format!(
            "# DB_CA=$(nctl get {} {} -p {} --print-ca-cert)",
            mysql_kind,
            quote_arg(&config.mysql_name),
            project
        ),
        format!(
            "# REDIS_CA=$(nctl get {} {} -p {} --print-ca-cert)",
            ResourceKind::KeyValueStore,
            quote_arg(&config.kvs_name),
            project
        ),
        format!("# nctl update app {} -p {} \\", app, project),
        format!("#   --env DATABASE_URL={} \\", quote_value(database_url)),
        "#   --env DB_CHARSET='utf8mb4' \\".to_string(),
        "#   --env DB_SSL_CA_PEM=\"$DB_CA\" \\".to_string(),
        format!("#   --env REDIS_URL={} \\", quote_value(redis_url)),
        "#   --env REDIS_CA_PEM=\"$REDIS_CA\" \\".to_string(),
        format!(
            "#   --env S3_ENDPOINT={} --env S3_REGION={} \\",
            quote_value(&s3.endpoint),
            quote_value(&s3.region)
        ),
        format!(
            "#   --env S3_BUCKET={} --env S3_ACCESS_KEY={} --env S3_SECRET_KEY={} \\",
            quote_value(&s3.bucket),
            quote_value(&s3.access_key),
            quote_value(&s3.secret_key)
        ),
        "#   --env S3_USE_PATH_STYLE='true'".to_string(),
        String::new(),
        "# Build env (example):".to_string(),
        format!(
            "# nctl update app {} -p {} --build-env BP_PHP_WEB_DIR=public --build-env BP_COMPOSER_INSTALL_OPTIONS='--ignore-platform-reqs'",
            app, project
        ),
        "# (build env does not belong in .deploio.yaml)".to_string(),
    ];

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
