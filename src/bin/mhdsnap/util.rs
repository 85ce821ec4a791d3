use mhdsnap::{CellRecord, SnapshotMetadata, VarValue};

pub fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{:e}", x)).collect();
    format!("[{}]", parts.join(", "))
}

pub fn fmt_value(v: &VarValue) -> String {
    match v {
        VarValue::Mhd(s) => format!(
            "rho={:e} mom={} E={:e} B={}",
            s.density,
            fmt_vec(&s.momentum),
            s.energy,
            fmt_vec(&s.magnetic_field)
        ),
        VarValue::Primary(flags) => format!("{:?}", flags),
        VarValue::BgB(v) => fmt_vec(v),
        VarValue::DivFaceB(x) => format!("{:e}", x),
        VarValue::EdgeE(v) => fmt_vec(v),
        VarValue::FaceB(v) => fmt_vec(v),
        VarValue::Rank(r) => r.to_string(),
        VarValue::MhdInfo(x) => format!("{:#010x}", x),
        VarValue::RefLvls([cur, target]) => format!("current={} target={}", cur, target),
    }
}

pub fn print_record(cell_id: u64, rec: &CellRecord) {
    println!("cell {} (#{}):", cell_id, rec.index);
    for (kind, value) in &rec.values {
        println!("  {:<9} {}", kind.name(), fmt_value(value));
    }
}

pub fn print_metadata(m: &SnapshotMetadata) {
    println!("file_version: {}", m.file_version);
    if let Some(step) = m.sim_step {
        println!("sim_step: {}", step);
    }
    println!("sim_time: {:e}", m.params.sim_time);
    println!("adiabatic_index: {}", m.params.adiabatic_index);
    println!("proton_mass: {:e}", m.params.proton_mass);
    println!("vacuum_permeability: {:e}", m.params.vacuum_permeability);
    println!("endianness: {:#018x}", m.grid.endianness);
    println!("ref_lvl_0_cells: {:?}", m.grid.ref_lvl_0_cells);
    println!("max_ref_lvl: {}", m.grid.max_ref_lvl);
    println!("neighborhood_length: {}", m.grid.neighborhood_length);
    println!("periodicity: {:?}", m.grid.periodicity);
    println!("geometry_id: {}", m.grid.geometry_id);
    println!("grid_start: {}", fmt_vec(&m.grid.grid_start));
    println!("lvl_0_cell_length: {}", fmt_vec(&m.grid.lvl_0_cell_length));
    println!("total_cells: {}", m.grid.total_cells);
    println!("cell_list_start: {}", m.cell_list_start);
    for d in m.variables.iter() {
        println!("var {:?}: data_start={}", d.name, d.data_start);
    }
}
