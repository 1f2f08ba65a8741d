use std::path::PathBuf;

use crate::Hash;

/// error type for twig operations
///
/// display strings are the user-facing messages printed by the cli.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not in an initialized twig directory: {0}")]
    NoRepo(PathBuf),

    #[error("A twig version-control system already exists in {0}")]
    RepoExists(PathBuf),

    #[error("Incorrect operands.")]
    IncorrectOperands,

    #[error("Please enter a commit message.")]
    EmptyMessage,

    #[error("No changes added to the commit.")]
    NothingToCommit,

    #[error("File does not exist: {0}")]
    FileNotFound(String),

    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    #[error("No reason to remove the file.")]
    NoReasonToRemove(String),

    #[error("A branch with that name already exists.")]
    BranchExists(String),

    #[error("A branch with that name does not exist.")]
    BranchNotFound(String),

    #[error("No such branch exists.")]
    NoSuchBranch(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("Cannot remove the current branch.")]
    RemoveCurrentBranch,

    #[error("No need to checkout the current branch.")]
    CheckoutCurrentBranch,

    #[error("No commit with that id exists.")]
    CommitNotFound(String),

    #[error("File does not exist in that commit.")]
    FileNotInCommit(String),

    #[error("Found no commit with that message.")]
    MessageNotFound(String),

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    MergeWithSelf,

    #[error("no common ancestor between {0} and {1}")]
    NoCommonAncestor(Hash, Hash),

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileInTheWay(String),

    #[error("A remote with that name already exists.")]
    RemoteExists(String),

    #[error("A remote with that name does not exist.")]
    RemoteNotFound(String),

    #[error("object not found: {0}")]
    ObjectNotFound(Hash),

    #[error("ambiguous id '{prefix}' matches {count} objects")]
    AmbiguousPrefix { prefix: String, count: usize },

    #[error("invalid object id: {0}")]
    InvalidHashPrefix(String),

    #[error("invalid hash hex: {0}")]
    InvalidHashHex(String),

    #[error("corrupt object: hash mismatch for {0}")]
    CorruptObject(Hash),

    #[error("corrupt repository state: {0}")]
    CorruptState(String),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cbor serialization error: {0}")]
    CborEncode(#[from] ciborium::ser::Error<std::io::Error>),

    #[error("cbor deserialization error: {0}")]
    CborDecode(#[from] ciborium::de::Error<std::io::Error>),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

/// coarse failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// malformed or missing arguments
    InputError,
    /// unknown branch, commit, object, remote or file
    NotFound,
    /// an id prefix matched more than one object
    Ambiguous,
    /// the operation's preconditions do not hold
    PreconditionFailed,
    /// an untracked file would be overwritten
    WorkingTreeConflict,
    /// unreadable or unwritable repository data
    Storage,
}

impl Error {
    /// category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::IncorrectOperands
            | Error::InvalidFileName(_)
            | Error::InvalidBranchName(_)
            | Error::InvalidHashPrefix(_)
            | Error::InvalidHashHex(_) => ErrorKind::InputError,

            Error::NoRepo(_)
            | Error::FileNotFound(_)
            | Error::BranchNotFound(_)
            | Error::NoSuchBranch(_)
            | Error::CommitNotFound(_)
            | Error::FileNotInCommit(_)
            | Error::MessageNotFound(_)
            | Error::NoCommonAncestor(..)
            | Error::RemoteNotFound(_)
            | Error::ObjectNotFound(_) => ErrorKind::NotFound,

            Error::AmbiguousPrefix { .. } => ErrorKind::Ambiguous,

            Error::RepoExists(_)
            | Error::EmptyMessage
            | Error::NothingToCommit
            | Error::NoReasonToRemove(_)
            | Error::BranchExists(_)
            | Error::RemoveCurrentBranch
            | Error::CheckoutCurrentBranch
            | Error::UncommittedChanges
            | Error::MergeWithSelf
            | Error::RemoteExists(_) => ErrorKind::PreconditionFailed,

            Error::UntrackedFileInTheWay(_) => ErrorKind::WorkingTreeConflict,

            Error::CorruptObject(_)
            | Error::CorruptState(_)
            | Error::Io { .. }
            | Error::CborEncode(_)
            | Error::CborDecode(_)
            | Error::Config(_)
            | Error::ConfigSerialize(_) => ErrorKind::Storage,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(Error::NothingToCommit.to_string(), "No changes added to the commit.");
        assert_eq!(Error::EmptyMessage.to_string(), "Please enter a commit message.");
        assert_eq!(
            Error::NoReasonToRemove("a.txt".into()).to_string(),
            "No reason to remove the file."
        );
        assert_eq!(
            Error::AmbiguousPrefix {
                prefix: "ab".into(),
                count: 3
            }
            .to_string(),
            "ambiguous id 'ab' matches 3 objects"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::IncorrectOperands.kind(), ErrorKind::InputError);
        assert_eq!(Error::CommitNotFound("ab".into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::AmbiguousPrefix {
                prefix: "a".into(),
                count: 2
            }
            .kind(),
            ErrorKind::Ambiguous
        );
        assert_eq!(Error::MergeWithSelf.kind(), ErrorKind::PreconditionFailed);
        assert_eq!(
            Error::UntrackedFileInTheWay("f".into()).kind(),
            ErrorKind::WorkingTreeConflict
        );
        assert_eq!(Error::CorruptObject(Hash::ZERO).kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_with_path() {
        let err: Result<()> = Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
            .with_path("/tmp/x");
        match err {
            Err(Error::Io { path, .. }) => assert_eq!(path, PathBuf::from("/tmp/x")),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
