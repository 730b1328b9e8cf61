//! Assembling a [`ReleaseDescriptor`] from operator inputs and the artifact.

use std::io::{self, Read, Seek};

use relpub_schema::{
    Channel, Checksum, EntitlementConstraints, Filetype, ProductId, ReleaseDescriptor,
    ReleaseVersion, Signature, VersionError,
};
use thiserror::Error;

use crate::io::artifact::ArtifactFile;
use crate::io::digest;
use crate::reporter::Reporter;
use crate::signing::{Signer, SigningAlgorithm, SigningError, SigningKeySource};

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error("failed to checksum artifact: {0}")]
    Checksum(io::Error),

    #[error("failed to rewind artifact: {0}")]
    Rewind(#[from] io::Error),
}

/// Key material and scheme for signing the artifact.
#[derive(Debug, Clone)]
pub struct SigningOptions {
    pub key: SigningKeySource,
    pub algorithm: SigningAlgorithm,
}

/// Raw release inputs, before validation.
#[derive(Debug, Clone)]
pub struct ReleaseInputs {
    pub product: ProductId,
    /// Unparsed version string.
    pub version: String,
    /// Overrides the artifact's basename.
    pub filename: Option<String>,
    /// Explicit filetype, or `auto`.
    pub filetype: String,
    pub channel: Channel,
    pub platform: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub constraints: EntitlementConstraints,
    /// Pre-computed checksum, used verbatim.
    pub checksum: Option<Checksum>,
    /// Pre-computed signature, used verbatim.
    pub signature: Option<Signature>,
    pub signing: Option<SigningOptions>,
}

impl ReleaseInputs {
    /// Inputs with every optional field at its default.
    pub fn new(product: impl Into<ProductId>, version: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            version: version.into(),
            filename: None,
            filetype: Filetype::AUTO.to_string(),
            channel: Channel::default(),
            platform: None,
            name: None,
            description: None,
            constraints: EntitlementConstraints::default(),
            checksum: None,
            signature: None,
            signing: None,
        }
    }
}

/// Validate `inputs` and compute the integrity metadata of `artifact`.
///
/// Everything that can be rejected without reading the artifact (version,
/// signing key) is checked first. The artifact is left at byte 0.
pub fn build<R: Reporter + ?Sized>(
    inputs: &ReleaseInputs,
    artifact: &mut ArtifactFile,
    reporter: &R,
) -> Result<ReleaseDescriptor, DescriptorError> {
    let basename = artifact.filename().to_string();
    let filesize = artifact.filesize();
    tracing::debug!("Describing {}", artifact.path().display());

    artifact.pass(|file| describe(inputs, file, &basename, filesize, reporter))
}

/// [`build`] over any seekable stream holding the artifact's `filesize`
/// bytes. `basename` is the filename used when `inputs` has none.
pub fn describe<S, R>(
    inputs: &ReleaseInputs,
    stream: &mut S,
    basename: &str,
    filesize: u64,
    reporter: &R,
) -> Result<ReleaseDescriptor, DescriptorError>
where
    S: Read + Seek,
    R: Reporter + ?Sized,
{
    let version = ReleaseVersion::parse(&inputs.version)?;
    let filename = inputs
        .filename
        .clone()
        .unwrap_or_else(|| basename.to_string());
    let filetype = Filetype::resolve(&inputs.filetype, &filename);

    let signer = match (&inputs.signature, &inputs.signing) {
        (None, Some(opts)) => Some(Signer::from_hex(&opts.key.load()?, opts.algorithm)?),
        _ => None,
    };

    let checksum = match &inputs.checksum {
        Some(sum) => sum.clone(),
        None => {
            tracing::debug!("Computing checksum of {filename}");
            digest::checksum(stream).map_err(DescriptorError::Checksum)?
        }
    };

    let signature = match (&inputs.signature, signer) {
        (Some(sig), _) => Some(sig.clone()),
        (None, Some(signer)) => {
            tracing::debug!("Signing {} with {}", filename, signer.algorithm());
            if signer.algorithm() == SigningAlgorithm::Ed25519 {
                reporter.warning(
                    "using ed25519 to sign large files is not recommended (use ed25519ph instead)",
                );
            }
            Some(signer.sign(inputs.product.as_str(), stream)?)
        }
        (None, None) => None,
    };

    Ok(ReleaseDescriptor {
        product: inputs.product.clone(),
        version,
        filesize,
        filename,
        filetype,
        channel: inputs.channel,
        platform: inputs.platform.clone(),
        name: inputs.name.clone(),
        description: inputs.description.clone(),
        constraints: inputs.constraints.clone(),
        checksum,
        signature,
    })
}
