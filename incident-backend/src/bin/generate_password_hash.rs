use incident_backend::utils::password::{Argon2Config, PasswordManager};
use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let password = match args.get(1) {
        // コマンドライン引数からパスワードを取得
        Some(arg) => arg.clone(),
        // インタラクティブにパスワードを入力
        None => match prompt_password() {
            Ok(password) => password,
            Err(e) => {
                eprintln!("Error reading password: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    // パスワードが空でないかチェック
    if password.is_empty() {
        eprintln!("Error: Password cannot be empty");
        return ExitCode::FAILURE;
    }

    let manager = match PasswordManager::new(Argon2Config::from_env()) {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("Error configuring Argon2: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match manager.hash_password(&password) {
        Ok(password_hash) => {
            println!("\n=== Password Hash Generated ===");
            println!("Hash: {}", password_hash);
            println!("\nTo seed a user:");
            println!(
                "UPDATE user_master SET password_hash = '{}' WHERE user_name = '<user>';",
                password_hash
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error generating password hash: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn prompt_password() -> io::Result<String> {
    print!("Enter password to hash: ");
    io::stdout().flush()?;

    let mut password = String::new();
    io::stdin().read_line(&mut password)?;
    Ok(password.trim().to_string())
}
