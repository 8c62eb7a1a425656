//! 提交代码归档
//!
//! 所有提交最终都以 `{submission_key}.zip` 的形式落在归档目录里：
//! 目录递归打包，已有的 .zip 原样复制，单个文件单独打包。

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::AppConfig;
use crate::errors::{AutograderError, Result};

/// 某次提交的归档落盘路径
pub fn submission_archive_path(submission_key: &str) -> PathBuf {
    let config = AppConfig::get();
    Path::new(&config.submissions.submissions_dir).join(format!("{submission_key}.zip"))
}

/// 确保目录存在
pub fn ensure_dir(dir: &str) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// 把提交的代码打包到 `dest`
pub fn package_submission(code: &Path, dest: &Path) -> Result<()> {
    if code.is_dir() {
        archive_directory(code, dest)
    } else if code.extension().and_then(|e| e.to_str()) == Some("zip") {
        std::fs::copy(code, dest)?;
        Ok(())
    } else if code.is_file() {
        archive_single_file(code, dest)
    } else {
        Err(AutograderError::file_operation(format!(
            "提交路径不存在: {}",
            code.display()
        )))
    }
}

/// 递归打包一个目录，归档内路径相对于目录根
pub fn archive_directory(dir: &Path, dest: &Path) -> Result<()> {
    let out = File::create(dest)?;
    let mut zip = ZipWriter::new(out);
    let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    add_dir_entries(&mut zip, dir, dir, opts)?;
    zip.finish()?;
    Ok(())
}

fn add_dir_entries(
    zip: &mut ZipWriter<File>,
    root: &Path,
    dir: &Path,
    opts: SimpleFileOptions,
) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = path
            .strip_prefix(root)
            .map_err(|e| AutograderError::archive(format!("归档路径计算失败: {e}")))?
            .to_string_lossy()
            .replace('\\', "/");

        if path.is_dir() {
            zip.add_directory(format!("{name}/"), opts)?;
            add_dir_entries(zip, root, &path, opts)?;
        } else {
            zip.start_file(name, opts)?;
            let mut f = File::open(&path)?;
            let mut buf = Vec::new();
            f.read_to_end(&mut buf)?;
            zip.write_all(&buf)?;
        }
    }
    Ok(())
}

/// 把单个文件打成只有一个条目的归档
pub fn archive_single_file(file: &Path, dest: &Path) -> Result<()> {
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AutograderError::archive(format!("无效的文件名: {}", file.display())))?;

    let out = File::create(dest)?;
    let mut zip = ZipWriter::new(out);
    let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(name, opts)?;
    let mut f = File::open(file)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    zip.write_all(&buf)?;
    zip.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate_magic_bytes;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_magic(path: &Path) -> Vec<u8> {
        let mut f = File::open(path).unwrap();
        let mut buf = [0u8; 4];
        f.read_exact(&mut buf).unwrap();
        buf.to_vec()
    }

    #[test]
    fn test_archive_directory() {
        let src = tempfile::tempdir().unwrap();
        std::fs::create_dir(src.path().join("sub")).unwrap();
        std::fs::write(src.path().join("main.py"), "print('hi')").unwrap();
        std::fs::write(src.path().join("sub/util.py"), "x = 1").unwrap();

        let out = tempfile::tempdir().unwrap();
        let dest = out.path().join("code.zip");
        archive_directory(src.path(), &dest).unwrap();

        assert!(validate_magic_bytes(&read_magic(&dest), ".zip"));

        let mut archive = ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains(&"main.py".to_string()));
        assert!(names.contains(&"sub/util.py".to_string()));
    }

    #[test]
    fn test_archive_single_file() {
        let src = tempfile::tempdir().unwrap();
        let file = src.path().join("solution.c");
        std::fs::write(&file, "int main() { return 0; }").unwrap();

        let out = tempfile::tempdir().unwrap();
        let dest = out.path().join("code.zip");
        archive_single_file(&file, &dest).unwrap();

        let mut archive = ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        assert_eq!(archive.len(), 1);
        let mut entry = archive.by_index(0).unwrap();
        assert_eq!(entry.name(), "solution.c");
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "int main() { return 0; }");
    }

    #[test]
    fn test_package_submission_copies_existing_zip() {
        let src = tempfile::tempdir().unwrap();
        let file = src.path().join("ready.zip");
        // 真实的空 zip
        let out_file = File::create(&file).unwrap();
        ZipWriter::new(out_file).finish().unwrap();

        let out = tempfile::tempdir().unwrap();
        let dest = out.path().join("code.zip");
        package_submission(&file, &dest).unwrap();
        assert!(dest.exists());
        assert_eq!(
            std::fs::read(&file).unwrap(),
            std::fs::read(&dest).unwrap()
        );
    }

    #[test]
    fn test_package_submission_missing_path() {
        let out = tempfile::tempdir().unwrap();
        let dest = out.path().join("code.zip");
        assert!(package_submission(Path::new("/no/such/path"), &dest).is_err());
    }
}
