use std::io::{Read, Seek};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zip::result::{InvalidPassword, ZipError};
use zip::ZipArchive;

use crate::knx::error::{Error, Result};

const ZIP_PASSWORD_SALT: &str = "21.project.ets.knx.org";
const ZIP_PASSWORD_ITERATIONS: u32 = 65_536;
const ZIP_PASSWORD_KEY_LEN: usize = 32;

pub(crate) fn strip_bom(input: &str) -> &str {
    input.strip_prefix('\u{feff}').unwrap_or(input)
}

/// Turns an ETS project password into the password of the nested project archive.
pub(crate) fn derive_zip_password(project_password: &str) -> String {
    let mut password_bytes = Vec::with_capacity(project_password.len() * 2);
    for unit in project_password.encode_utf16() {
        password_bytes.extend_from_slice(&unit.to_le_bytes());
    }

    let mut derived = [0u8; ZIP_PASSWORD_KEY_LEN];
    pbkdf2_hmac::<Sha256>(
        &password_bytes,
        ZIP_PASSWORD_SALT.as_bytes(),
        ZIP_PASSWORD_ITERATIONS,
        &mut derived,
    );
    BASE64_STANDARD.encode(derived)
}

/// Names of all entries in central directory order.
pub(crate) fn entry_names<R: Read + Seek>(zip: &mut ZipArchive<R>) -> Result<Vec<String>, ZipError> {
    let mut names = Vec::with_capacity(zip.len());
    for index in 0..zip.len() {
        let file = zip.by_index_raw(index)?;
        names.push(file.name().to_string());
    }
    Ok(names)
}

/// Reads one entry completely. The entry stream is dropped before returning,
/// on success and on every error path.
pub(crate) fn read_entry_bytes<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    name: &str,
    password: Option<&str>,
) -> Result<Vec<u8>> {
    log::debug!(
        "Reading entry {} (password: {})",
        name,
        if password.is_some() { "yes" } else { "no" }
    );
    let entry_error = |source: ZipError| Error::EntryOpen {
        entry: name.to_string(),
        source,
    };

    let mut file = if let Some(password) = password {
        match zip.by_name_decrypt(name, password.as_bytes()) {
            Ok(Ok(file)) => file,
            Ok(Err(InvalidPassword)) => {
                return Err(Error::InvalidPassword {
                    entry: name.to_string(),
                })
            }
            Err(ZipError::UnsupportedArchive(msg)) if msg == ZipError::PASSWORD_REQUIRED => {
                return Err(Error::PasswordRequired {
                    entry: name.to_string(),
                })
            }
            Err(err) => return Err(entry_error(err)),
        }
    } else {
        match zip.by_name(name) {
            Ok(file) => file,
            Err(ZipError::UnsupportedArchive(msg)) if msg == ZipError::PASSWORD_REQUIRED => {
                return Err(Error::PasswordRequired {
                    entry: name.to_string(),
                })
            }
            Err(err) => return Err(entry_error(err)),
        }
    };

    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .map_err(|err| entry_error(ZipError::Io(err)))?;
    Ok(contents)
}
