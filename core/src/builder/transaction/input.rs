use bitcoin::{Amount, OutPoint, ScriptBuf, Sequence, TxIn, TxOut, Witness};

/// An output locked by a P2WSH witness script that can be used as an input.
#[derive(Debug, Clone)]
pub struct SpendableTxIn {
    /// The reference to the previous output that is being used as an input.
    previous_outpoint: OutPoint,
    prevout: TxOut, // locking script (p2wsh => op_0 op_pushbytes_32 sha256(witness script))

    witness_script: ScriptBuf,
}

impl SpendableTxIn {
    pub fn new(previous_outpoint: OutPoint, value: Amount, witness_script: ScriptBuf) -> Self {
        let prevout = TxOut {
            value,
            script_pubkey: ScriptBuf::new_p2wsh(&witness_script.wscript_hash()),
        };

        SpendableTxIn {
            previous_outpoint,
            prevout,
            witness_script,
        }
    }

    pub fn get_prevout(&self) -> &TxOut {
        &self.prevout
    }

    pub fn get_prev_outpoint(&self) -> &OutPoint {
        &self.previous_outpoint
    }

    pub fn get_witness_script(&self) -> &ScriptBuf {
        &self.witness_script
    }
}

#[derive(Debug, Clone)]
pub struct SpentTxIn {
    spendable: SpendableTxIn,
    sequence: Sequence,
}

impl SpentTxIn {
    pub fn from_spendable(spendable: SpendableTxIn, sequence: Sequence) -> SpentTxIn {
        SpentTxIn {
            spendable,
            sequence,
        }
    }

    pub fn get_spendable(&self) -> &SpendableTxIn {
        &self.spendable
    }

    /// Input with an empty script sig and no witness, ready to be placed in an
    /// unsigned transaction.
    pub fn to_txin(&self) -> TxIn {
        TxIn {
            previous_output: self.spendable.previous_outpoint,
            sequence: self.sequence,
            script_sig: ScriptBuf::default(),
            witness: Witness::new(),
        }
    }
}
