use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

fn project_with_missing_keys() -> Result<CliTest> {
    let test = CliTest::with_file(
        "src/index.ts",
        r#"
const { DB_URL } = process.env;
console.log(process.env.API_KEY);
"#,
    )?;
    test.write_file("src/lib/pay.js", "export const key = process.env['STRIPE_KEY'];")?;
    test.write_file("src/lib/client.tsx", "fetch(process.env.API_KEY!);")?;
    test.write_file(".env", "DB_URL=postgres://localhost\nOLD_TOKEN=abc\n")?;
    Ok(test)
}

#[test]
fn test_missing_keys_fail_the_check() -> Result<()> {
    let test = project_with_missing_keys()?;

    assert_cmd_snapshot!(test.check_command(), @r#"
    success: false
    exit_code: 1
    ----- stdout -----
    error: "API_KEY"  missing-key
      --> src/index.ts
       = note: not defined in .env
       = also used: src/lib/client.tsx

    error: "STRIPE_KEY"  missing-key
      --> src/lib/pay.js
       = note: not defined in .env

    warning: "OLD_TOKEN"  unused-key
      --> .env:2
       = hint: remove it from the env file if it is no longer needed

    ✘ 3 problems (2 errors, 1 warning)
    tip: run with --sync to add missing keys to .env.example
    Stats: 3 files scanned | 3 variables found

    ----- stderr -----
    "#);

    assert!(!test.root().join(".env.example").exists());

    Ok(())
}

#[test]
fn test_in_sync_project_passes() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.ts",
        "const { PORT, HOST } = process.env; let NODE_ENV; ({ NODE_ENV } = process.env);",
    )?;
    test.write_file(".env", "PORT=3000\nHOST=localhost\nexport NODE_ENV=production\n")?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 1 source file - code and .env are in sync
    Stats: 1 file scanned | 3 variables found

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_decorated_sources_are_scanned() -> Result<()> {
    let test = CliTest::with_file(
        "src/app.service.ts",
        r#"
@Injectable()
export class AppService {
  constructor(@Inject(CONFIG) private readonly config: Config) {}

  get url() {
    return process.env.SERVICE_URL;
  }
}
"#,
    )?;
    test.write_file(".env", "SERVICE_URL=http://localhost\n")?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 1 source file - code and .env are in sync
    Stats: 1 file scanned | 1 variable found

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_unused_keys_only_warn() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", "process.env.PORT;")?;
    test.write_file(".env", "PORT=3000\nLEGACY=1\n")?;

    assert_cmd_snapshot!(test.check_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    warning: "LEGACY"  unused-key
      --> .env:2
       = hint: remove it from the env file if it is no longer needed

    ✘ 1 problem (0 errors, 1 warning)
    Stats: 1 file scanned | 1 variable found

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_sync_creates_template() -> Result<()> {
    let test = project_with_missing_keys()?;

    // .env itself is still incomplete, so the check still fails
    assert_cmd_snapshot!(test.check_command().arg("--sync"), @r#"
    success: false
    exit_code: 1
    ----- stdout -----
    error: "API_KEY"  missing-key
      --> src/index.ts
       = note: not defined in .env
       = also used: src/lib/client.tsx

    error: "STRIPE_KEY"  missing-key
      --> src/lib/pay.js
       = note: not defined in .env

    warning: "OLD_TOKEN"  unused-key
      --> .env:2
       = hint: remove it from the env file if it is no longer needed

    ✘ 3 problems (2 errors, 1 warning)
    ✓ Created .env.example with 2 keys
    Stats: 3 files scanned | 3 variables found

    ----- stderr -----
    "#);

    assert_eq!(
        test.read_file(".env.example")?,
        "# Environment Variables Template\nAPI_KEY=\nSTRIPE_KEY=\n"
    );

    Ok(())
}

#[test]
fn test_sync_appends_only_new_keys() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", "process.env.API_KEY; process.env.STRIPE_KEY;")?;
    test.write_file(".env", "API_KEY=secret\n")?;
    test.write_file(".env.example", "API_KEY=\nOLD_STRIPE_KEY=")?;

    assert_cmd_snapshot!(test.check_command().arg("--sync"), @r#"
    success: false
    exit_code: 1
    ----- stdout -----
    error: "STRIPE_KEY"  missing-key
      --> src/app.ts
       = note: not defined in .env

    ✘ 1 problem (1 error, 0 warnings)
    ✓ Added 1 key to .env.example
    Stats: 1 file scanned | 2 variables found

    ----- stderr -----
    "#);

    assert_eq!(
        test.read_file(".env.example")?,
        "API_KEY=\nOLD_STRIPE_KEY=\nSTRIPE_KEY=\n"
    );

    Ok(())
}

#[test]
fn test_json_output() -> Result<()> {
    let test = project_with_missing_keys()?;

    assert_cmd_snapshot!(test.check_command().arg("--json"), @r#"
    success: false
    exit_code: 1
    ----- stdout -----
    {
      "envFile": ".env",
      "envFileExists": true,
      "filesScanned": 3,
      "missing": [
        "API_KEY",
        "STRIPE_KEY"
      ],
      "unused": [
        "OLD_TOKEN"
      ],
      "existing": [
        "DB_URL"
      ],
      "usages": {
        "API_KEY": [
          "src/index.ts",
          "src/lib/client.tsx"
        ],
        "DB_URL": [
          "src/index.ts"
        ],
        "STRIPE_KEY": [
          "src/lib/pay.js"
        ]
      },
      "parseErrors": []
    }

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_parse_errors_are_skipped() -> Result<()> {
    let test = CliTest::with_file("src/ok.ts", "process.env.PORT;")?;
    test.write_file("src/broken.ts", "const = process.env.SECRET;;;")?;
    test.write_file(".env", "PORT=1\n")?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 2 source files - code and .env are in sync
    warning: 1 file(s) could not be parsed (use -v for details)
    Stats: 2 files scanned | 1 variable found

    ----- stderr -----
    ");

    // Verbose output carries debug logs on stderr, so only stdout is checked.
    let (code, stdout, _) = run(test.check_command().arg("-v"))?;
    assert_eq!(code, 0);
    assert!(stdout.contains("parse-error\n  --> src/broken.ts\n"));
    assert!(!stdout.contains("could not be parsed"));

    Ok(())
}

#[test]
fn test_missing_env_file() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", "process.env.PORT;")?;

    assert_cmd_snapshot!(test.check_command(), @r#"
    success: false
    exit_code: 1
    ----- stdout -----
    warning: .env not found, every used key is reported missing
    error: "PORT"  missing-key
      --> src/app.ts
       = note: not defined in .env

    ✘ 1 problem (1 error, 0 warnings)
    tip: run with --sync to add missing keys to .env.example
    Stats: 1 file scanned | 1 variable found

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_env_and_include_overrides() -> Result<()> {
    let test = CliTest::with_file("app/server.js", "process.env.PORT;")?;
    test.write_file("src/ignored.ts", "process.env.OTHER;")?;
    test.write_file(".env.local", "PORT=1\n")?;

    assert_cmd_snapshot!(
        test.check_command()
            .args(["--env", ".env.local", "--include", "app/**/*.js"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 1 source file - code and .env.local are in sync
    Stats: 1 file scanned | 1 variable found

    ----- stderr -----
    "
    );

    Ok(())
}

#[test]
fn test_config_file_is_used() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".envguardianrc.json",
        r#"{
         "includes": ["lib"],
         "ignores": ["**/generated/**"],
         "envFile": ".env.development"
     }"#,
    )?;
    test.write_file("lib/a.mjs", "process.env.A;")?;
    test.write_file("lib/generated/b.ts", "process.env.B;")?;
    test.write_file(".env.development", "A=1\n")?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 1 source file - code and .env.development are in sync
    Stats: 1 file scanned | 1 variable found

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_node_modules_ignored_by_default() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", "process.env.PORT;")?;
    test.write_file("src/node_modules/pkg/index.js", "process.env.VENDOR;")?;
    test.write_file(".env", "PORT=1\n")?;

    assert_cmd_snapshot!(test.check_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 1 source file - code and .env are in sync
    Stats: 1 file scanned | 1 variable found

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".envguardianrc.json", r#"{ "includes": ["src/**/[bad"] }"#)?;

    let (code, stdout, stderr) = run(&mut test.check_command())?;

    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert!(stderr.starts_with("Error: Invalid glob pattern in 'includes': \"src/**/[bad\""));

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let (code, stdout, _) = run(test.command().arg("--help"))?;

    assert_eq!(code, 0);
    assert!(stdout.contains("Usage: env-guardian [COMMAND]"));
    assert!(stdout.contains("  check  "));
    assert!(stdout.contains("  init   "));

    Ok(())
}
