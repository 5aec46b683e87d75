use alloy::primitives::{Address, TxHash};

/// What the network reported once the deployment transaction was included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub address: Address,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pending,
    Confirmed(Confirmation),
}

/// Handle of a single deployment, from submission to confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    tx_hash: TxHash,
    status: Status,
}

impl Deployment {
    pub fn pending(tx_hash: TxHash) -> Self {
        Self {
            tx_hash,
            status: Status::Pending,
        }
    }

    /// Records the confirmation. A handle is confirmed at most once, later
    /// confirmations are ignored.
    pub fn confirm(&mut self, confirmation: Confirmation) {
        match self.status {
            Status::Pending => self.status = Status::Confirmed(confirmation),
            Status::Confirmed(existing) => tracing::warn!(
                tx_hash = ?self.tx_hash,
                ?existing,
                ignored = ?confirmation,
                "deployment already confirmed"
            ),
        }
    }

    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// The contract address, only known once confirmed.
    pub fn address(&self) -> Option<Address> {
        match self.status {
            Status::Pending => None,
            Status::Confirmed(confirmation) => Some(confirmation.address),
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::{B256, address},
    };

    #[test]
    fn confirms_once() {
        let mut deployment = Deployment::pending(B256::repeat_byte(1));
        assert_eq!(deployment.status(), Status::Pending);
        assert_eq!(deployment.address(), None);

        let first = Confirmation {
            address: address!("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
            block_number: Some(1),
            gas_used: 100_000,
        };
        deployment.confirm(first);
        assert_eq!(deployment.status(), Status::Confirmed(first));

        deployment.confirm(Confirmation {
            address: address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"),
            block_number: Some(2),
            gas_used: 1,
        });
        assert_eq!(deployment.address(), Some(first.address));
        assert_eq!(deployment.tx_hash(), B256::repeat_byte(1));
    }
}
