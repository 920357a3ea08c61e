use delegate_common::{
    crypto::PublicKey,
    serializer::{Reader, ReaderError, Serializer, Writer},
};
use serde::{Deserialize, Serialize};

use crate::{constants::ID, runtime::AccountState};

/// Permission for `user` to receive routed proceeds
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Access {
    pub user: PublicKey,
    pub is_granted: bool,
    pub bump: u8,
}

impl Serializer for Access {
    fn write(&self, writer: &mut Writer) {
        self.user.write(writer);
        writer.write_bool(self.is_granted);
        writer.write_u8(self.bump);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            user: reader.read()?,
            is_granted: reader.read_bool()?,
            bump: reader.read_u8()?,
        })
    }

    fn size(&self) -> usize {
        32 + 1 + 1
    }
}

impl AccountState for Access {
    const NAME: &'static str = "Access";

    fn owner() -> PublicKey {
        *ID
    }
}
