use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream};

use super::{DownloadError, Result};

const ANONYMOUS: &str = "anonymous";

/// Anonymous, passive-mode FTP access to one host.
///
/// Every call opens its own control connection, so a fetcher can be shared
/// across download workers.
#[derive(Debug, Clone)]
pub struct FtpFetcher {
    addr: String,
}

impl FtpFetcher {
    /// `host` without a port; the standard control port 21 is used.
    pub fn new(host: &str) -> Self {
        Self {
            addr: format!("{host}:21"),
        }
    }

    /// Source URL for a directory on this host, as recorded in metadata.
    pub fn url(&self, path: &str) -> String {
        let host = self.addr.strip_suffix(":21").unwrap_or(&self.addr);
        format!("ftp://{host}{path}")
    }

    fn connect(&self) -> Result<FtpStream> {
        let mut ftp = FtpStream::connect(&self.addr).map_err(ftp_err("connect", &self.addr))?;
        ftp.login(ANONYMOUS, ANONYMOUS)
            .map_err(ftp_err("login", &self.addr))?;
        ftp.transfer_type(FileType::Binary)
            .map_err(ftp_err("TYPE I", &self.addr))?;
        Ok(ftp)
    }

    /// Names in `dir`, as the server lists them.
    pub fn list(&self, dir: &str) -> Result<Vec<String>> {
        let mut ftp = self.connect()?;
        ftp.cwd(dir).map_err(ftp_err("CWD", dir))?;
        let names = ftp.nlst(None).map_err(ftp_err("NLST", dir))?;
        quit(ftp);
        log::debug!("{dir}: {} entries", names.len());
        Ok(names)
    }

    /// RETR `remote_path` (absolute on the server) into `dest`, returning the
    /// number of bytes written.
    pub fn fetch_to_file(&self, remote_path: &str, dest: &Path) -> Result<u64> {
        let mut ftp = self.connect()?;
        log::debug!("RETR {remote_path}");
        let mut stream = ftp
            .retr_as_stream(remote_path)
            .map_err(ftp_err("RETR", remote_path))?;

        let file = File::create(dest).map_err(|e| DownloadError::io(dest, e))?;
        let mut writer = BufWriter::new(file);
        let written = io::copy(&mut stream, &mut writer).map_err(|e| DownloadError::io(dest, e))?;
        writer.flush().map_err(|e| DownloadError::io(dest, e))?;

        ftp.finalize_retr_stream(stream)
            .map_err(ftp_err("RETR", remote_path))?;
        quit(ftp);

        log::info!("{remote_path} -> {} ({written} bytes)", dest.display());
        Ok(written)
    }
}

fn ftp_err<'a>(command: &'a str, target: &'a str) -> impl Fn(FtpError) -> DownloadError + 'a {
    move |source| DownloadError::Ftp {
        action: format!("{command} {target}"),
        source,
    }
}

/// The transfer already succeeded; a failed QUIT only loses the goodbye.
fn quit(mut ftp: FtpStream) {
    if let Err(e) = ftp.quit() {
        log::warn!("FTP QUIT failed: {e}");
    }
}

/// Last path segment of a listing entry; some servers return full paths
/// from NLST.
pub fn entry_name(entry: &str) -> &str {
    entry.rsplit('/').next().unwrap_or(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_url_has_no_port() {
        let ftp = FtpFetcher::new("ftp.ebi.ac.uk");
        assert_eq!(
            ftp.url("/empiar/world_availability/11759/data"),
            "ftp://ftp.ebi.ac.uk/empiar/world_availability/11759/data"
        );
    }

    #[test]
    fn entry_name_strips_directories() {
        assert_eq!(entry_name("slice_001.dm3"), "slice_001.dm3");
        assert_eq!(entry_name("/empiar/data/slice_001.dm3"), "slice_001.dm3");
        assert_eq!(entry_name("data/"), "");
    }

    #[test]
    fn failed_commands_name_their_target() {
        let err = ftp_err("CWD", "/pub/missing")(FtpError::BadResponse);
        assert_eq!(err.to_string(), "FTP CWD /pub/missing failed");
    }
}
